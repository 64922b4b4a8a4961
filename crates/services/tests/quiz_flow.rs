use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{ExamClock, QuizController};
use study_core::quiz::{TimerState, Topic};

#[tokio::test(start_paused = true)]
async fn exam_expires_through_clock_ticks() {
    let mut ctrl = QuizController::new(StdRng::seed_from_u64(5));
    let (mut clock, mut ticks) = ExamClock::channel();

    let ticket = ctrl.start_exam(Topic::PriceControls, 5, 1).expect("exam");
    assert!(ticket.needs_clock());
    clock.arm(ticket.id);

    let first = ctrl.session().unwrap().questions()[0];
    ctrl.select_answer(first.id, first.correct_index).unwrap();

    let mut received = 0;
    while let Some(id) = ticks.recv().await {
        received += 1;
        if ctrl.tick(id) == Some(TimerState::Expired) {
            clock.stop();
            break;
        }
    }

    assert_eq!(received, 60);
    let session = ctrl.session().unwrap();
    assert!(session.is_locked());
    assert!(session.reveal_answers());
    assert_eq!(session.remaining_display(), "0:00");
    assert_eq!(ctrl.score().unwrap().correct, 1);
}

#[tokio::test(start_paused = true)]
async fn replacing_an_exam_silences_the_old_countdown() {
    let mut ctrl = QuizController::new(StdRng::seed_from_u64(6));
    let (mut clock, mut ticks) = ExamClock::channel();

    let old = ctrl.start_exam(Topic::Shifts, 5, 5).unwrap();
    clock.arm(old.id);
    let id = ticks.recv().await.unwrap();
    assert_eq!(ctrl.tick(id), Some(TimerState::Running));

    let practice = ctrl.generate(Topic::Shifts, 5).unwrap();
    assert!(!practice.needs_clock());
    clock.stop();

    // A tick for the old exam may still be in flight; it must be ignored.
    assert_eq!(ctrl.tick(old.id), None);
    assert_eq!(ctrl.session().unwrap().timer_state(), TimerState::Idle);

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert!(ticks.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn submit_before_expiry_stops_the_countdown() {
    let mut ctrl = QuizController::new(StdRng::seed_from_u64(7));
    let (mut clock, mut ticks) = ExamClock::channel();

    let exam = ctrl.start_exam(Topic::QuotaTariff, 8, 10).unwrap();
    clock.arm(exam.id);
    for _ in 0..3 {
        let id = ticks.recv().await.unwrap();
        ctrl.tick(id);
    }

    assert!(ctrl.submit().unwrap());
    clock.stop();

    let session = ctrl.session().unwrap();
    assert_eq!(session.timer_state(), TimerState::StoppedBySubmit);
    assert_eq!(session.remaining_secs(), 597);
    assert!(!ctrl.toggle_reveal().unwrap());

    let retry = ctrl.retry_wrong_or_unanswered().unwrap().expect("all unanswered");
    assert_eq!(retry.questions, 8);
    assert!(!retry.needs_clock());
}
