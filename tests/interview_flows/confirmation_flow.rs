use tsuzuri::interview::{Hypothesis, ScriptedAnswers, Session, SessionOptions};
use tsuzuri::profile::{JudgeMethod, Verdict};

use super::scripted_provider::{ScriptedProvider, turn};

const NOTES: &str = "- 06:30 ジョギング\n- 07:30 朝ごはん";
const LONG: &str = "六時半に起きて川沿いを走りました。そのあと朝ごはんを作りました。";

fn session_with_pending(max: usize, summary_every: usize) -> Session {
    let options = SessionOptions {
        summary_every,
        pending_hypotheses: vec![
            Hypothesis::new("stable_facts", "朝型"),
            Hypothesis::new("ongoing_topics", "マラソン練習"),
        ],
        ..SessionOptions::default()
    };
    Session::new(NOTES, 12, max, 1, options)
}

#[tokio::test]
async fn explicit_yes_confirms_without_asking_the_model() {
    let provider = ScriptedProvider::new([turn("Q1？"), turn("Q2？"), turn("つまり朝型ということですか？")]);
    let mut answers = ScriptedAnswers::new([LONG, LONG, "はい、朝型です"]);
    let mut session = session_with_pending(3, 2);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 3);
    assert!(!calls[1].last_user().contains("[stable_facts] 朝型"));
    assert!(calls[2].last_user().contains("[stable_facts] 朝型"));
    assert!(!calls[2].last_user().contains("マラソン練習"));

    assert_eq!(transcript.outcomes.len(), 1);
    let outcome = &transcript.outcomes[0];
    assert_eq!(outcome.question_num, 3);
    assert_eq!(outcome.category, "stable_facts");
    assert_eq!(outcome.verdict, Verdict::Confirmed);
    assert_eq!(outcome.method, JudgeMethod::Rule);
    assert_eq!(outcome.answer, "はい、朝型です");

    assert_eq!(session.pending_hypotheses().len(), 1);
    assert_eq!(session.pending_hypotheses()[0].value, "マラソン練習");
    assert_eq!(transcript.metrics.confirmation_attempts, 1);
    assert_eq!(transcript.metrics.confirmed, 1);
}

#[tokio::test]
async fn ambiguous_answer_is_judged_by_the_model() {
    let provider = ScriptedProvider::new([
        turn("Q1？"),
        turn("Q2？"),
        turn("朝型ですか？"),
        r#"{"result":"denied","reason":"夜に活動すると回答"}"#.to_string(),
    ]);
    let mut answers = ScriptedAnswers::new([LONG, LONG, "最近は夜のほうが元気かも"]);
    let mut session = session_with_pending(3, 2);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[3].system.contains("判定器"));
    assert!(calls[3].last_user().contains("確認対象: [stable_facts] 朝型"));
    assert!(calls[3].last_user().contains("回答: 最近は夜のほうが元気かも"));

    let outcome = &transcript.outcomes[0];
    assert_eq!(outcome.verdict, Verdict::Denied);
    assert_eq!(outcome.method, JudgeMethod::Llm);
    assert_eq!(outcome.reason, "夜に活動すると回答");
    assert_eq!(transcript.metrics.denied, 1);
    assert_eq!(session.pending_hypotheses().len(), 1);
}

#[tokio::test]
async fn judge_failure_keeps_hypothesis_pending() {
    let provider = ScriptedProvider::new([turn("Q1？"), turn("Q2？"), turn("朝型ですか？")]);
    provider.push_failure("timeout");
    let mut answers = ScriptedAnswers::new([LONG, LONG, "どうだろう"]);
    let mut session = session_with_pending(3, 2);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    let outcome = &transcript.outcomes[0];
    assert_eq!(outcome.verdict, Verdict::Uncertain);
    assert_eq!(outcome.method, JudgeMethod::Rule);
    assert_eq!(outcome.reason, "no explicit signal");
    assert_eq!(session.pending_hypotheses().len(), 2);
    assert_eq!(transcript.metrics.uncertain, 1);
}

#[tokio::test]
async fn short_answers_trigger_unknowns_confirmation() {
    let provider = ScriptedProvider::new([turn("Q1？"), turn("Q2？"), turn("Q3？"), turn("朝型ですか？")]);
    let mut answers = ScriptedAnswers::new(["うん", "まあ", "そう", "いいえ"]);
    let mut session = session_with_pending(4, 100);

    let transcript = session.run(&provider, &mut answers).await.unwrap();

    let calls = provider.calls();
    assert!(calls[3].last_user().contains("（3件相当）"));
    assert!(calls[3].last_user().contains("[stable_facts] 朝型"));
    assert_eq!(transcript.outcomes.len(), 1);
    assert_eq!(transcript.outcomes[0].verdict, Verdict::Denied);
    assert_eq!(transcript.outcomes[0].question_num, 4);
}
