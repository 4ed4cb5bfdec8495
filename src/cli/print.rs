//! Plain-text output for the CLI.

use rand::Rng;

use topo::quiz::{Answer, GameStats, OptionMark, QuizQuestion};
use topo::render::MarkerLayer;
use topo::session::{StatusKind, StatusMessage};
use topo::{Outcome, PlaceRecord, Session};

pub fn places<R: Rng>(session: &Session<MarkerLayer, R>) {
    let store = session.store();
    if store.is_empty() {
        println!("No places.");
        return;
    }
    for (i, record) in store.records().iter().enumerate() {
        println!("{:>3}. {}", i + 1, place_line(record));
    }
    println!("{}", store.summary());
    println!("Map: {}", session.renderer().viewport());
}

fn place_line(record: &PlaceRecord) -> String {
    match (record.location(), record.error()) {
        (Some(loc), _) => format!(
            "{} -> {} ({:.4}, {:.4}){}",
            record.name,
            loc.display_name,
            loc.point.lat,
            loc.point.lon,
            loc.place_type.map(|t| format!(" [{}]", t)).unwrap_or_default()
        ),
        (None, Some(err)) => format!("{} -> not found: {}", record.name, err),
        (None, None) => record.name.clone(),
    }
}

pub fn question(question: &QuizQuestion) {
    println!();
    println!("Which place is marked on the map?");
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}) {} {}", i + 1, option.icon, option.place.name);
    }
}

pub fn answer(question: &QuizQuestion, answer: &Answer) {
    if answer.correct {
        println!("Correct!");
    } else {
        println!("Wrong, it was {}.", question.correct_place().name);
    }
    for (option, mark) in question.options().iter().zip(&answer.marks) {
        let tag = match mark {
            OptionMark::Correct => "✔",
            OptionMark::Wrong => "✘",
            OptionMark::Neutral => " ",
        };
        println!("  {} {}", tag, option.place.name);
    }
}

pub fn stats(stats: &GameStats) {
    println!(
        "Score: {}/{}  streak: {}",
        stats.correct_answers, stats.total_questions, stats.current_streak
    );
}

pub fn status(message: Option<&StatusMessage>) {
    if let Some(message) = message {
        match message.kind {
            StatusKind::Error => eprintln!("! {}", message.text),
            StatusKind::Success | StatusKind::Loading => println!("{}", message.text),
        }
    }
}

pub fn outcome<R: Rng>(session: &Session<MarkerLayer, R>, outcome: &Outcome) {
    match outcome {
        Outcome::Found { .. } | Outcome::Loaded { .. } => {
            places(session);
            status(session.status());
        }
        Outcome::Cleared => println!("Cleared."),
        Outcome::Saved(_) => status(session.save_status()),
        Outcome::NothingToOpen => println!("That URL does not reference a list."),
        Outcome::Label { id, visible } => {
            let name = session
                .store()
                .get(*id)
                .map(|r| r.name.as_str())
                .unwrap_or_default();
            println!("Label {} {}", name, if *visible { "shown" } else { "hidden" });
        }
        Outcome::Question(q) => question(q),
        Outcome::Answered(a) => {
            if let Some(q) = session.quiz().question() {
                answer(q, a);
            }
            stats(&session.quiz().stats());
        }
        Outcome::QuizExited => println!("Quiz finished, all markers visible."),
    }
}
