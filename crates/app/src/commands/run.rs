//! The `revise run` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use revise_core::SortingKey;
use services::{RevisionSession, RunType, SessionLoopService};
use storage::CsvQuestionFile;

use super::{build_filter, load_settings};
use crate::PoolArgs;

pub struct RunOptions {
    pub mode: Option<RunType>,
    pub sort: Option<SortingKey>,
    pub desc: bool,
    pub pool: PoolArgs,
    pub rounds: Option<u32>,
    pub shuffle: Option<bool>,
    pub dry_run: bool,
}

pub fn execute(config: Option<PathBuf>, file: PathBuf, options: RunOptions) -> Result<()> {
    let settings = load_settings(config.as_deref())?;
    let filter = build_filter(&options.pool)?;
    let run_type = resolve_run_type(options.mode, options.sort, options.desc)?;
    tracing::debug!(?run_type, shuffle = ?options.shuffle, "run options resolved");

    let loop_svc = SessionLoopService::new(settings, Arc::new(CsvQuestionFile::new(&file)));
    let mut all = loop_svc
        .load()
        .with_context(|| format!("failed to load {}", file.display()))?;
    let mut session = loop_svc
        .start_session(&all, &filter, run_type, options.shuffle)
        .context("failed to start session")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    ask_questions(
        &mut session,
        options.rounds,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )?;

    let summary = loop_svc
        .finish_session(&mut all, session, !options.dry_run)
        .with_context(|| format!("failed to save {}", file.display()))?;

    println!();
    println!("Finished after {} rounds. {}", summary.rounds, summary.stats);
    if options.dry_run {
        println!("Dry run: {} not modified.", file.display());
    } else {
        println!("Saved {} questions to {}.", all.len(), file.display());
    }
    Ok(())
}

/// Picks the run type from `--mode` and `--sort`. `None` defers to settings.
fn resolve_run_type(
    mode: Option<RunType>,
    sort: Option<SortingKey>,
    desc: bool,
) -> Result<Option<RunType>> {
    let custom = |key: SortingKey| {
        let mut key = key;
        key.set_reverse(desc);
        Some(RunType::Custom(key))
    };

    Ok(match (mode, sort) {
        (None | Some(RunType::Custom(_)), Some(key)) => custom(key),
        (Some(RunType::Custom(key)), None) => custom(key),
        (Some(mode), Some(_)) => bail!("--sort only applies to custom runs, not {mode}"),
        (mode, None) => mode,
    })
}

enum Reply {
    Answer(bool),
    Quit,
}

/// Asks questions until `rounds` answers are given, the user quits, or input ends.
fn ask_questions<R: BufRead, W: Write>(
    session: &mut RevisionSession,
    rounds: Option<u32>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "Mode: {}. Answer y, n or q to stop.", session.run_type())?;

    while rounds.is_none_or(|limit| session.rounds() < limit) {
        let Some(question) = session.current() else {
            break;
        };

        writeln!(output)?;
        if session.run_type().resorts_every_round() {
            writeln!(output, "Round {}", session.rounds() + 1)?;
        } else {
            writeln!(
                output,
                "Question {} of {} (pass {})",
                session.position_in_pass(),
                session.pool_size(),
                session.passes()
            )?;
        }
        writeln!(output, "{question}")?;
        writeln!(
            output,
            "Correct {}/{}, likelihood {:.2}",
            question.correct(),
            question.attempted(),
            question.likelihood()
        )?;

        let Some(reply) = read_reply(input, output)? else {
            break;
        };
        match reply {
            Reply::Quit => break,
            Reply::Answer(was_correct) => {
                session.answer_current(was_correct)?;
                writeln!(output, "{}", session.stats())?;
            }
        }
    }
    Ok(())
}

/// Prompts until a recognised reply arrives. `None` at end of input.
fn read_reply<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<Reply>> {
    loop {
        write!(output, "Did you answer correctly? [y/n/q]: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("failed to read answer")? == 0 {
            return Ok(None);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(Reply::Answer(true))),
            "n" | "no" => return Ok(Some(Reply::Answer(false))),
            "q" | "quit" => return Ok(Some(Reply::Quit)),
            _ => writeln!(output, "Please answer y, n or q.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revise_core::model::{NumericAttribute, QuestionAttribute, QuestionAttributes};
    use revise_core::{Question, QuestionList};
    use services::SessionBuilder;

    fn session(run_type: RunType) -> RevisionSession {
        let questions: QuestionList = (0..3)
            .map(|i| {
                let attributes = QuestionAttributes::new(
                    &format!("Q{i}"),
                    "Waves",
                    "Paper 2",
                    "Physics",
                    "GCSE",
                    "WJEC",
                )
                .unwrap();
                Question::new(i, attributes)
            })
            .collect();
        SessionBuilder::new(run_type).build(questions).unwrap()
    }

    fn play(session: &mut RevisionSession, rounds: Option<u32>, input: &str) -> String {
        let mut output = Vec::new();
        ask_questions(session, rounds, &mut input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn answers_until_quit_and_reprompts_on_junk() {
        let mut session = session(RunType::Test);
        let output = play(&mut session, None, "y\nmaybe\nn\nq\ny\n");
        assert_eq!(session.rounds(), 2);
        assert_eq!(session.stats().correct(), 1);
        assert!(output.contains("Please answer y, n or q."));
        assert!(output.contains("Question 1 of 3 (pass 1)"));
    }

    #[test]
    fn stops_at_round_limit_or_end_of_input() {
        let mut limited = session(RunType::Revise);
        play(&mut limited, Some(2), "y\ny\ny\ny\n");
        assert_eq!(limited.rounds(), 2);

        let mut ended = session(RunType::Revise);
        let output = play(&mut ended, None, "n\n");
        assert_eq!(ended.rounds(), 1);
        assert!(output.contains("Round 2"));
    }

    #[test]
    fn sort_flag_selects_custom_run() {
        let topic = SortingKey::ascending(QuestionAttribute::Topic);
        assert_eq!(
            resolve_run_type(None, Some(topic), true).unwrap(),
            Some(RunType::Custom(SortingKey::new(QuestionAttribute::Topic, true)))
        );
        assert_eq!(
            resolve_run_type(Some(RunType::Custom(SortingKey::test())), None, true).unwrap(),
            Some(RunType::Custom(SortingKey::new(NumericAttribute::Index, true)))
        );
        assert_eq!(resolve_run_type(None, None, false).unwrap(), None);
        assert_eq!(
            resolve_run_type(Some(RunType::Test), None, false).unwrap(),
            Some(RunType::Test)
        );
        assert!(resolve_run_type(Some(RunType::Revise), Some(topic), false).is_err());
    }
}
