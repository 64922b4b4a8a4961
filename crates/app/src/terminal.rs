use rand::Rng;
use services::{ExamClock, QuizController, QuizControllerError, QuizSettings, SessionTicket};
use study_core::model::QuestionId;
use study_core::quiz::{AnswerOutcome, TimerState, parse_choice_label};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

/// One line of user input during a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// 1-based question number and choice index.
    Answer { number: usize, choice: usize },
    Submit,
    Reveal,
    Reset,
    RetryWrong,
    RetryWrongOrUnanswered,
    NewQuiz,
    NewExam { minutes: Option<u32> },
    Show,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Input::Empty,
        ["submit" | "s"] => Input::Submit,
        ["reveal" | "r"] => Input::Reveal,
        ["reset"] => Input::Reset,
        ["retry"] => Input::RetryWrong,
        ["retry", "all"] => Input::RetryWrongOrUnanswered,
        ["new" | "n"] => Input::NewQuiz,
        ["exam"] => Input::NewExam { minutes: None },
        ["exam", minutes] => minutes.parse().map_or_else(
            |_| Input::Invalid(line.trim().to_owned()),
            |m| Input::NewExam { minutes: Some(m) },
        ),
        ["show" | "ls"] => Input::Show,
        ["help" | "h" | "?"] => Input::Help,
        ["quit" | "q" | "exit"] => Input::Quit,
        [number, letter] => match (number.parse::<usize>(), parse_choice_label(letter)) {
            (Ok(number), Some(choice)) if number > 0 => Input::Answer { number, choice },
            _ => Input::Invalid(line.trim().to_owned()),
        },
        _ => Input::Invalid(line.trim().to_owned()),
    }
}

const HELP: &str = "\
Commands:
  <n> <letter>   answer question n (e.g. `3 b`)
  submit, s      lock answers and show the score
  reveal, r      show or hide the answer key after submitting
  reset          clear answers and start over with the same questions
                 (exams: only after submitting)
  retry          practice the wrongly answered questions
  retry all      practice wrong and unanswered questions
  new, n         new practice quiz
  exam [min]     new timed exam
  show           print the quiz again
  quit, q        leave";

/// Seconds left at which the countdown is announced between redraws.
fn announce(remaining: u32) -> bool {
    remaining > 0 && (remaining % 60 == 0 || remaining == 30 || remaining <= 10)
}

struct Quiz<R> {
    controller: QuizController<R>,
    clock: ExamClock,
    settings: QuizSettings,
}

impl<R: Rng> Quiz<R> {
    fn install(&mut self, ticket: SessionTicket) {
        if ticket.needs_clock() {
            self.clock.arm(ticket.id);
        } else {
            self.clock.stop();
        }
        self.show();
    }

    fn show(&self) {
        if let Some(session) = self.controller.session() {
            println!("{}", render::session(session));
            println!("{}", render::actions(session));
        }
    }

    fn start(&mut self, exam_minutes: Option<u32>) -> Result<(), QuizControllerError> {
        let topic = self.settings.topic();
        let count = self.settings.count();
        let ticket = match exam_minutes {
            Some(minutes) => self.controller.start_exam(topic, count, minutes)?,
            None => self.controller.generate(topic, count)?,
        };
        self.install(ticket);
        Ok(())
    }

    fn retry(&mut self, all: bool) -> Result<(), QuizControllerError> {
        let ticket = if all {
            self.controller.retry_wrong_or_unanswered()?
        } else {
            self.controller.retry_wrong_only()?
        };
        match ticket {
            Some(ticket) => self.install(ticket),
            None => println!("Nothing to retry."),
        }
        Ok(())
    }

    fn answer(&mut self, number: usize, choice: usize) -> Result<(), QuizControllerError> {
        let Some(id) = self.question_id(number) else {
            println!("There is no question {number}.");
            return Ok(());
        };
        match self.controller.select_answer(id, choice)? {
            AnswerOutcome::Recorded { .. } => {}
            AnswerOutcome::Locked => {
                println!("Answers are locked. `reset` or `retry` to keep practicing.");
            }
        }
        Ok(())
    }

    fn question_id(&self, number: usize) -> Option<QuestionId> {
        let session = self.controller.session()?;
        session.questions().get(number.checked_sub(1)?).map(|q| q.id)
    }

    /// Returns `false` when the user asked to leave.
    fn handle(&mut self, input: Input) -> Result<bool, QuizControllerError> {
        match input {
            Input::Answer { number, choice } => self.answer(number, choice)?,
            Input::Submit => {
                if self.controller.submit()? {
                    self.clock.stop();
                    self.show();
                } else {
                    println!("Already submitted.");
                }
            }
            Input::Reveal => {
                if self.controller.toggle_reveal()? {
                    self.show();
                } else {
                    println!("Submit first; exam answers stay visible once revealed.");
                }
            }
            Input::Reset => {
                if self.controller.reset()? {
                    self.clock.stop();
                    self.show();
                } else {
                    println!("The exam is still running. `submit` first, then `reset`.");
                }
            }
            Input::RetryWrong => self.retry(false)?,
            Input::RetryWrongOrUnanswered => self.retry(true)?,
            Input::NewQuiz => self.start(None)?,
            Input::NewExam { minutes: None } => self.start(Some(self.settings.exam_minutes()))?,
            Input::NewExam {
                minutes: Some(minutes),
            } => match self.settings.with_exam_minutes(minutes) {
                Ok(settings) => self.start(Some(settings.exam_minutes()))?,
                Err(err) => println!("{err}"),
            },
            Input::Show => self.show(),
            Input::Help => println!("{HELP}"),
            Input::Quit => return Ok(false),
            Input::Empty => {}
            Input::Invalid(raw) => println!("Unrecognized input: {raw} (type `help`)"),
        }
        Ok(true)
    }

    fn on_tick(&mut self, id: services::SessionId) {
        let Some(state) = self.controller.tick(id) else {
            return;
        };
        match state {
            TimerState::Expired => {
                self.clock.stop();
                println!("⏰ Time's up! Answers are locked.");
                self.show();
            }
            TimerState::Running => {
                if let Some(session) = self.controller.session() {
                    let remaining = session.remaining_secs();
                    if announce(remaining) {
                        println!("⏳ Time Left: {}", session.remaining_display());
                    }
                }
            }
            TimerState::Idle | TimerState::StoppedBySubmit => self.clock.stop(),
        }
    }
}

/// Runs an interactive quiz on stdin/stdout until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or a quiz cannot be generated.
pub async fn run<R: Rng>(
    rng: R,
    settings: QuizSettings,
    exam_minutes: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (clock, mut ticks) = ExamClock::channel();
    let mut quiz = Quiz {
        controller: QuizController::new(rng),
        clock,
        settings,
    };

    println!(
        "{} · {} questions{}",
        settings.topic().label(),
        settings.count(),
        exam_minutes.map_or_else(String::new, |m| format!(" · {m} minute exam"))
    );
    println!("Type `help` for commands.");
    quiz.start(exam_minutes)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match quiz.handle(parse_input(&line)) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => println!("{err}"),
                }
            }
            Some(id) = ticks.recv() => quiz.on_tick(id),
        }
    }

    quiz.clock.stop();
    if let Some(session) = quiz.controller.session() {
        let score = session.score();
        tracing::info!(correct = score.correct, total = score.total, "quiz closed");
    }
    Ok(())
}
