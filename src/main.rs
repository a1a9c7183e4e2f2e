use anyhow::{Context, Result};
use regex::Regex;
use std::{
    env,
    io::{self, BufRead, Write},
};
use stride::{
    assessment::{shuffled_right_values, Answer, Phase, Question, QuestionKind, Session},
    config::{load_assessment, Config},
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = Config::from_env().context("failed to read configuration")?;
    let path = env::args().nth(1).unwrap_or(config.assessment_path);
    let assessment = load_assessment(&path)
        .context(format!("could not load assessment from {}", path))?;

    let mut rng = rand::thread_rng();
    let mut session = Session::new(&assessment, &mut rng);
    let mut lines = io::stdin().lock().lines();

    println!("{BOLD}{}{RESET}\n", assessment.title);

    loop {
        match session.phase() {
            Phase::InProgress { topic, question } => {
                let Some(current) = session.current_question().cloned() else {
                    // nothing drawn for this topic
                    session = session.advance()?;
                    continue;
                };
                let set = &session.sets()[topic];
                println!(
                    "{BOLD}{}{RESET} - question {} of {}",
                    set.name,
                    question + 1,
                    set.len()
                );

                let right_values = match &current.kind {
                    QuestionKind::Matching { pairs } => shuffled_right_values(pairs, &mut rng),
                    _ => Vec::new(),
                };
                print_question(&current, &right_values);

                let Some(line) = prompt(&mut lines, "> ")? else {
                    return Ok(());
                };
                let Some(answer) = parse_answer(&current.kind, &line, &right_values) else {
                    println!("Could not read that answer, try again.\n");
                    continue;
                };

                session = session.submit_answer(&current.id, answer)?;
                match session.advance() {
                    Ok(next) => session = next,
                    Err(e) => println!("{}\n", e),
                }
                println!();
            }
            Phase::TopicFeedback { topic } => {
                let result = session
                    .topic_result(topic)
                    .context("evaluated topic has no result")?;
                println!("{BOLD}{} complete{RESET}", result.name);
                println!("{} correct", result);
                println!("{}\n", result.tier);

                if prompt(&mut lines, "Press enter to continue ")?.is_none() {
                    return Ok(());
                }
                session = session.continue_to_next_topic()?;
                println!();
            }
            Phase::Complete => {
                let summary = session.summary().context("complete session has no summary")?;
                println!("{BOLD}Summary{RESET}");
                for result in &summary.results {
                    println!("  {:<24} {:>6}  {}", result.name, result.to_string(), result.tier);
                }
                println!(
                    "\n{BOLD}{}/{}{RESET} correct overall\n",
                    summary.total_correct(),
                    summary.total_questions()
                );

                match prompt(&mut lines, "Type 'restart' to try again, or press enter to quit ")? {
                    Some(line) if line.trim().eq_ignore_ascii_case("restart") => {
                        session = session.restart();
                        println!();
                    }
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn print_question(question: &Question, right_values: &[String]) {
    println!("{}", question.prompt);
    match &question.kind {
        QuestionKind::SingleChoice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }
        }
        QuestionKind::FillBlank { .. } => println!("  (type your answer)"),
        QuestionKind::TrueFalse { .. } => println!("  (true / false)"),
        QuestionKind::Matching { pairs } => {
            for (i, pair) in pairs.iter().enumerate() {
                println!("  {}. {}", i + 1, pair.left);
            }
            for (i, value) in right_values.iter().enumerate() {
                println!("  {}. {}", letter(i), value);
            }
            println!("  (e.g. 1=B, 2=A)");
        }
    }
}

fn letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    lines.next().transpose().context("failed to read from stdin")
}

/// Turns a typed line into an answer for `kind`; `None` when it does not parse.
fn parse_answer(kind: &QuestionKind, line: &str, right_values: &[String]) -> Option<Answer> {
    let line = line.trim();
    match kind {
        QuestionKind::SingleChoice { options, .. } => match line.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Some(Answer::Choice(n - 1)),
            _ => None,
        },
        QuestionKind::FillBlank { .. } => Some(Answer::text(line)),
        QuestionKind::TrueFalse { .. } => match line.to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" => Some(Answer::Flag(true)),
            "false" | "f" | "no" | "n" => Some(Answer::Flag(false)),
            _ => None,
        },
        QuestionKind::Matching { pairs } => {
            let pattern = Regex::new(r"(\d+)\s*[=:-]\s*([A-Za-z])").ok()?;
            pattern
                .captures_iter(line)
                .map(|caps| {
                    let left = caps[1].parse::<usize>().ok()?.checked_sub(1)?;
                    let right = caps[2].to_ascii_uppercase().chars().next()? as usize - 'A' as usize;
                    if left >= pairs.len() {
                        return None;
                    }
                    Some((left, right_values.get(right)?.clone()))
                })
                .collect::<Option<Vec<_>>>()
                .map(Answer::pairs)
        }
    }
}
