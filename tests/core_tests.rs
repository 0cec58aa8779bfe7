// tests/core_tests.rs
use anyhow::Result;
use handrps_core::game::overlay::{Overlay, QUIT_HINT};
use handrps_core::game::session::{Display, Frame, HandDetector, KEY_ESC, Session, Stop, VideoSource};
use handrps_core::gesture::landmarks::{FINGER_BASES, FINGERTIPS, LANDMARK_COUNT};
use handrps_core::gesture::{classify, detect_gesture};
use handrps_core::{Game, GameConfig, GameError, Gesture, HandLandmarks, Landmark, Outcome, Phase, Score};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Tips/bases as in a typical frame: bases at y=0.5, thumb base at x=0.4.
fn fingers(extended: [bool; 5]) -> ([Landmark; 5], [Landmark; 5]) {
    let bases = [
        Landmark::new(0.4, 0.5),
        Landmark::new(0.5, 0.5),
        Landmark::new(0.5, 0.5),
        Landmark::new(0.5, 0.5),
        Landmark::new(0.5, 0.5),
    ];
    let mut tips = [Landmark::new(0.5, 0.6); 5];
    if extended[0] {
        tips[0] = Landmark::new(0.3, 0.4);
    }
    for i in 1..5 {
        if extended[i] {
            tips[i] = Landmark::new(0.5, 0.4);
        }
    }
    (tips, bases)
}

fn hand(extended: [bool; 5]) -> HandLandmarks {
    let (tips, bases) = fingers(extended);
    let mut points = vec![Landmark::new(0.5, 0.8); LANDMARK_COUNT];
    for (i, &index) in FINGERTIPS.iter().enumerate() {
        points[index] = tips[i];
    }
    for (i, &index) in FINGER_BASES.iter().enumerate() {
        points[index] = bases[i];
    }
    HandLandmarks::new(points)
}

const FIST: [bool; 5] = [false; 5];

#[test]
fn test_rock_gesture_detection() -> Result<()> {
    assert_eq!(detect_gesture(&hand(FIST))?, Some(Gesture::Rock));
    Ok(())
}

#[test]
fn test_scissors_gesture_detection() -> Result<()> {
    assert_eq!(detect_gesture(&hand([false, true, true, false, false]))?, Some(Gesture::Scissors));
    Ok(())
}

#[test]
fn test_paper_gesture_detection() -> Result<()> {
    assert_eq!(detect_gesture(&hand([true; 5]))?, Some(Gesture::Paper));
    // thumb tucked, four fingers up
    assert_eq!(detect_gesture(&hand([false, true, true, true, true]))?, Some(Gesture::Paper));
    Ok(())
}

#[test]
fn test_three_fingers_never_classified() {
    for a in 0..5 {
        for b in (a + 1)..5 {
            for c in (b + 1)..5 {
                let mut extended = [false; 5];
                extended[a] = true;
                extended[b] = true;
                extended[c] = true;
                let (tips, bases) = fingers(extended);
                assert_eq!(classify(&tips, &bases), None, "fingers {} {} {}", a, b, c);
            }
        }
    }
}

#[test]
fn test_two_fingers_other_than_scissors_unknown() {
    let (tips, bases) = fingers([true, true, false, false, false]);
    assert_eq!(classify(&tips, &bases), None);
    let (tips, bases) = fingers([false, false, false, true, true]);
    assert_eq!(classify(&tips, &bases), None);
}

#[test]
fn test_classifier_is_repeatable() {
    let (tips, bases) = fingers([false, true, true, false, false]);
    assert_eq!(classify(&tips, &bases), classify(&tips, &bases));
}

#[test]
fn test_empty_landmarks_is_error() {
    let err = detect_gesture(&HandLandmarks::default()).unwrap_err();
    assert!(matches!(err, GameError::GestureDetection(_)));
}

#[test]
fn test_countdown_reaches_playing() {
    let t0 = Instant::now();
    let mut game = Game::seeded(GameConfig::default(), 11);

    assert_eq!(game.tick(t0, true, None), Some(Phase::Countdown));
    assert_eq!(game.countdown, 3);
    assert_eq!(game.computer_choice, None);

    for second in 1..=3u64 {
        game.tick(t0 + Duration::from_secs(second), true, None);
    }
    assert_eq!(game.phase, Phase::Playing);
    assert!(game.computer_choice.is_some());
    assert_eq!(game.player_choice, None);
}

#[test]
fn test_countdown_continues_without_hand() {
    let t0 = Instant::now();
    let mut game = Game::seeded(GameConfig::default(), 11);

    assert_eq!(game.tick(t0, true, None), Some(Phase::Countdown));
    game.tick(t0 + Duration::from_secs(1), false, None);
    assert_eq!(game.countdown, 2);
    game.tick(t0 + Duration::from_secs(2), false, None);
    assert_eq!(game.tick(t0 + Duration::from_secs(3), false, None), Some(Phase::Playing));
    assert!(game.computer_choice.is_some());
}

#[test]
fn test_rock_beats_scissors_round() {
    let mut game = Game::seeded(GameConfig::default(), 11);
    game.phase = Phase::Playing;
    game.computer_choice = Some(Gesture::Scissors);

    assert_eq!(game.tick(Instant::now(), true, Some(Gesture::Rock)), Some(Phase::Result));
    assert_eq!(game.result(), "You Win!");
    assert_eq!(game.score, Score { player: 1, computer: 0 });
    assert_eq!(game.player_choice, Some(Gesture::Rock));
    assert_eq!(game.countdown, 3);
}

#[test]
fn test_waiting_without_hand_stays() {
    let mut game = Game::seeded(GameConfig::default(), 11);
    assert_eq!(game.tick(Instant::now(), false, Some(Gesture::Rock)), None);
    assert_eq!(game.phase, Phase::Waiting);
}

// Session with scripted collaborators

struct TestFrame;

impl Frame for TestFrame {
    fn dimensions(&self) -> (i32, i32) {
        (640, 480)
    }
}

struct ScriptedSource {
    frames: VecDeque<Result<TestFrame>>,
    dropped: Rc<Cell<u32>>,
}

impl VideoSource for ScriptedSource {
    type Frame = TestFrame;

    fn next_frame(&mut self) -> Result<TestFrame> {
        self.frames
            .pop_front()
            .unwrap_or_else(|| Err(GameError::Camera("Failed to capture video frame".into()).into()))
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.dropped.set(self.dropped.get() + 1);
    }
}

struct ScriptedDetector {
    hands: VecDeque<Option<HandLandmarks>>,
}

impl HandDetector<TestFrame> for ScriptedDetector {
    fn detect_hand(&mut self, _frame: &TestFrame) -> Result<Option<HandLandmarks>> {
        Ok(self.hands.pop_front().flatten())
    }
}

#[derive(Default)]
struct RecordingDisplay {
    keys: VecDeque<Option<i32>>,
    rendered: Rc<RefCell<Vec<Vec<Overlay>>>>,
}

impl Display<TestFrame> for RecordingDisplay {
    fn render(&mut self, _frame: &mut TestFrame, _hand: Option<&HandLandmarks>, overlays: &[Overlay]) -> Result<()> {
        self.rendered.borrow_mut().push(overlays.to_vec());
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<i32>> {
        Ok(self.keys.pop_front().flatten())
    }
}

fn session(
    frames: usize,
    hands: Vec<Option<HandLandmarks>>,
    keys: Vec<Option<i32>>,
) -> (Session<ScriptedSource, ScriptedDetector, RecordingDisplay>, Rc<Cell<u32>>, Rc<RefCell<Vec<Vec<Overlay>>>>) {
    let dropped = Rc::new(Cell::new(0));
    let rendered = Rc::new(RefCell::new(Vec::new()));
    let source = ScriptedSource {
        frames: (0..frames).map(|_| Ok(TestFrame)).collect(),
        dropped: Rc::clone(&dropped),
    };
    let detector = ScriptedDetector { hands: hands.into() };
    let display = RecordingDisplay {
        keys: keys.into(),
        rendered: Rc::clone(&rendered),
    };
    let game = Game::seeded(GameConfig::default(), 5);
    (Session::new(source, detector, display, game), dropped, rendered)
}

#[test]
fn test_session_plays_full_round() -> Result<()> {
    let (mut session, _, rendered) = session(6, vec![Some(hand(FIST)); 6], vec![]);
    let t0 = Instant::now();

    assert!(session.step(t0)?);
    assert_eq!(session.game.phase, Phase::Countdown);
    for second in 1..=3u64 {
        assert!(session.step(t0 + Duration::from_secs(second))?);
    }
    assert_eq!(session.game.phase, Phase::Playing);
    let computer = session.game.computer_choice.expect("computer chose at countdown end");

    assert!(session.step(t0 + Duration::from_millis(3100))?);
    assert_eq!(session.game.phase, Phase::Result);
    let outcome = Outcome::resolve(Gesture::Rock, computer);
    assert_eq!(session.game.outcome, Some(outcome));

    let mut expected = Score::default();
    expected.record(outcome);
    assert_eq!(session.game.score, expected);

    let frames = rendered.borrow();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0][0].text, "3");
    assert_eq!(frames[4][2].text, outcome.message());
    Ok(())
}

#[test]
fn test_session_survives_bad_landmarks_while_playing() -> Result<()> {
    let broken = HandLandmarks::new(vec![Landmark::default(); 3]);
    let (mut session, _, _) = session(2, vec![Some(broken), Some(hand(FIST))], vec![]);
    session.game.phase = Phase::Playing;
    session.game.computer_choice = Some(Gesture::Paper);

    let now = Instant::now();
    assert!(session.step(now)?);
    assert_eq!(session.game.phase, Phase::Playing);
    assert_eq!(session.game.player_choice, None);

    assert!(session.step(now)?);
    assert_eq!(session.game.phase, Phase::Result);
    assert_eq!(session.game.result(), "Computer Wins!");
    Ok(())
}

#[test]
fn test_session_quits_on_key_and_releases_once() -> Result<()> {
    let (mut session, dropped, rendered) = session(3, vec![None; 3], vec![None, Some(KEY_ESC)]);

    let (stop, score) = session.run()?;
    assert_eq!(stop, Stop::Quit);
    assert_eq!(score, Score::default());
    assert_eq!(rendered.borrow().len(), 2);
    assert_eq!(rendered.borrow()[0][0].text, "Show hand to start!");
    assert_eq!(rendered.borrow()[0].last().map(|o| o.text.as_str()), Some(QUIT_HINT));

    drop(session);
    assert_eq!(dropped.get(), 1);
    Ok(())
}

#[test]
fn test_session_stops_on_camera_error() {
    let (mut session, dropped, _) = session(1, vec![None], vec![]);

    let err = session.run().unwrap_err();
    assert!(matches!(err.downcast_ref::<GameError>(), Some(GameError::Camera(_))));

    drop(session);
    assert_eq!(dropped.get(), 1);
}

#[test]
fn test_session_stops_when_interrupted() -> Result<()> {
    let (session, dropped, rendered) = session(3, vec![None; 3], vec![]);
    let flag = Arc::new(AtomicBool::new(false));
    let mut session = session.with_interrupt(Arc::clone(&flag));

    flag.store(true, Ordering::Relaxed);
    let (stop, score) = session.run()?;
    assert_eq!(stop, Stop::Interrupted);
    assert_eq!(score, Score::default());
    assert!(rendered.borrow().is_empty());

    drop(session);
    assert_eq!(dropped.get(), 1);
    Ok(())
}

/// Hand model that goes down with the interrupt, as the tracker child does on Ctrl-C.
struct InterruptedDetector {
    flag: Arc<AtomicBool>,
}

impl HandDetector<TestFrame> for InterruptedDetector {
    fn detect_hand(&mut self, _frame: &TestFrame) -> Result<Option<HandLandmarks>> {
        self.flag.store(true, Ordering::Relaxed);
        anyhow::bail!("hand tracker exited unexpectedly")
    }
}

#[test]
fn test_error_after_interrupt_is_not_a_failure() -> Result<()> {
    let dropped = Rc::new(Cell::new(0));
    let source = ScriptedSource {
        frames: (0..3).map(|_| Ok(TestFrame)).collect(),
        dropped: Rc::clone(&dropped),
    };
    let flag = Arc::new(AtomicBool::new(false));
    let detector = InterruptedDetector { flag: Arc::clone(&flag) };
    let game = Game::seeded(GameConfig::default(), 5);
    let mut session = Session::new(source, detector, RecordingDisplay::default(), game).with_interrupt(flag);

    let (stop, _) = session.run()?;
    assert_eq!(stop, Stop::Interrupted);

    drop(session);
    assert_eq!(dropped.get(), 1);
    Ok(())
}
