use tsuzuri::error::SessionError;
use tsuzuri::interview::{ScriptedAnswers, Session, SessionOptions};
use tsuzuri::llm::MessageRole;

use super::scripted_provider::{ScriptedProvider, turn};

const NOTES: &str = "- 08:30 電車が遅れた\n- 12:10 新しいカレー屋\n- 21:00 読書";
const LONG: &str = "朝は電車が遅れて大変でしたが、昼のカレーがとても美味しかったです。";

fn session(max: usize, min: usize) -> Session {
    Session::new(NOTES, 12, max, min, SessionOptions::default())
}

#[tokio::test]
async fn session_runs_to_the_question_budget() {
    let provider = ScriptedProvider::new([turn("電車はどのくらい遅れましたか？"), turn("カレーはどうでしたか？"), turn("今日を一言で表すと？")]);
    let mut answers = ScriptedAnswers::new([LONG, LONG, LONG]);
    let mut session = session(3, 1);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    assert_eq!(answers.questions.len(), 3);
    assert_eq!(answers.questions[1], "カレーはどうでしたか？");
    assert_eq!(transcript.history.len(), 6);
    assert_eq!(transcript.history[0].role, MessageRole::Assistant);
    assert_eq!(transcript.history[1].content, LONG);
    assert_eq!(transcript.metrics.questions_total, 3);
    assert_eq!(transcript.metrics.structured_turns, 3);
    assert_eq!(transcript.metrics.fallback_turns, 0);
    assert!(transcript.outcomes.is_empty());

    let calls = provider.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.system == session.system_prompt()));
    assert!(calls[0].system.contains("21:00 読書"));
    assert!(calls[0].last_user().contains("最初の質問"));
    assert_eq!(calls[1].messages.len(), 3);
    assert!(calls[2].last_user().contains("3問目/3問中"));
}

#[tokio::test]
async fn early_exit_is_rejected_once_before_minimum() {
    let provider = ScriptedProvider::new([turn("Q1？"), turn("Q2？"), turn("Q3？"), turn("Q4？")]);
    let mut answers = ScriptedAnswers::new([
        LONG,
        "/done",
        "やっぱり答えます。夜は読書をしてゆっくり過ごしました。",
        "/done",
        "/done",
    ]);
    let mut session = session(8, 3);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    assert_eq!(answers.notices.len(), 2);
    assert!(answers.notices[0].contains("あと2問"));
    assert!(answers.notices[1].contains("あと1問"));
    // The third question was asked and counted but never answered.
    assert_eq!(transcript.metrics.questions_total, 3);
    assert_eq!(transcript.history.len(), 4);
    assert!(transcript.history[3].content.starts_with("やっぱり答えます"));
    assert_eq!(provider.remaining(), 1);
}

#[tokio::test]
async fn exit_after_minimum_is_honored_immediately() {
    let provider = ScriptedProvider::new([turn("Q1？"), turn("Q2？"), turn("Q3？")]);
    let mut answers = ScriptedAnswers::new([LONG, "/done"]);
    let mut session = session(8, 1);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    assert!(answers.notices.is_empty());
    assert_eq!(transcript.metrics.questions_total, 2);
    assert_eq!(transcript.history.len(), 2);
}

#[tokio::test]
async fn end_of_input_ends_the_session() {
    let provider = ScriptedProvider::new([turn("Q1？"), turn("Q2？")]);
    let mut answers = ScriptedAnswers::new([LONG]);
    let mut session = session(8, 3);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    assert_eq!(transcript.metrics.questions_total, 2);
    assert_eq!(transcript.history.len(), 2);
    assert!(answers.notices.is_empty());
}

#[tokio::test]
async fn transport_failure_aborts_with_turn_number() {
    let provider = ScriptedProvider::new([turn("Q1？")]);
    provider.push_failure("connection refused");
    let mut answers = ScriptedAnswers::new([LONG, LONG]);
    let mut session = session(8, 3);

    let err = session.run(&provider, &mut answers).await.unwrap_err();

    match err {
        SessionError::QuestionGeneration { turn, source } => {
            assert_eq!(turn, 2);
            assert!(source.to_string().contains("connection refused"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unstructured_reply_falls_back_to_first_question() {
    let provider = ScriptedProvider::new([
        "了解しました。\nつまり、朝は慌ただしかったということですか？ 続けて聞きます".to_string(),
        turn("夜はどう過ごしましたか？"),
    ]);
    let mut answers = ScriptedAnswers::new([LONG, LONG]);
    let mut session = session(2, 1);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    assert_eq!(answers.questions[0], "了解しました。");
    assert_eq!(transcript.metrics.fallback_turns, 1);
    assert_eq!(transcript.metrics.structured_turns, 1);
    assert_eq!(transcript.metrics.summary_check_turns, 0);
}

#[tokio::test]
async fn repeated_questions_raise_duplicate_rate() {
    let provider = ScriptedProvider::new([turn("今日はどうでしたか？"), turn("今日は どうでしたか?")]);
    let mut answers = ScriptedAnswers::new(["short", "short"]);
    let mut session = session(2, 1);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    assert!((transcript.metrics.duplicate_question_rate - 0.5).abs() < f64::EPSILON);
    assert!((transcript.metrics.avg_answer_length - 5.0).abs() < f64::EPSILON);
}
