#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use tsuzuri::llm::{ChatFuture, ChatMessage, ChatProvider};

/// One recorded `chat` call.
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

impl SeenCall {
    pub fn last_user(&self) -> &str {
        self.messages.last().map_or("", |m| m.content.as_str())
    }
}

/// Replays canned replies in order; `Err` entries simulate transport failures.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    seen: Mutex<Vec<SeenCall>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock_replies().push_back(Ok(reply.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock_replies().push_back(Err(message.into()));
    }

    pub fn calls(&self) -> Vec<SeenCall> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.lock_replies().len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// A structured turn reply asking `question`.
pub fn turn(question: &str) -> String {
    serde_json::json!({ "intent": "deep_dive", "summary_check": false, "question": question })
        .to_string()
}

impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn chat<'a>(&'a self, system: &'a str, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(SeenCall {
                system: system.to_string(),
                messages: messages.to_vec(),
            });
        let next = self.lock_replies().pop_front();
        Box::pin(async move {
            match next {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => Err(anyhow::anyhow!("scripted provider has no replies left")),
            }
        })
    }
}
