// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Assistant chat channel

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{EventBus, Subscription};
use crate::detection::ChatMessage;

const GREETING: &str = "Hello! I am RiverGuard Assistant. How can I help you today?";

/// Keyword-matched canned responder
pub struct ChatBot;

impl ChatBot {
    /// Produce the assistant's reply to an operator message
    pub fn reply(input: &str) -> String {
        let input = input.to_lowercase();

        if input.contains("hello") || input.contains("hi") {
            "Hello! How can I assist you with RiverGuard monitoring today?".to_string()
        } else if input.contains("help") {
            "I can help you with checking incident reports, monitoring camera feeds, \
             analyzing water quality data, or providing information about our monitoring system."
                .to_string()
        } else if input.contains("incident") || input.contains("report") {
            "You can view all reported incidents in the Incidents tab. \
             Would you like me to provide a summary of recent incidents?"
                .to_string()
        } else if input.contains("camera") || input.contains("feed") {
            "Our live camera feeds are accessible from the Feeds tab. \
             All feeds are monitored 24/7 by our AI detection system."
                .to_string()
        } else if input.contains("water quality") || input.contains("pollution") {
            "Our sensors continuously monitor water quality parameters including pH, \
             dissolved oxygen, turbidity, and temperature. Current readings show normal \
             conditions except for slightly elevated turbidity levels."
                .to_string()
        } else if input.contains("statistics") || input.contains("analytics") {
            "You can find detailed statistics in the Analytics tab, including incident \
             trends, detection rates, and water quality metrics over time."
                .to_string()
        } else if input.contains("upload") || input.contains("photo") || input.contains("image") {
            "You can upload images of incidents by clicking on the \"Report Incident\" \
             button on the Incidents page. This will allow you to submit details and an \
             image of the environmental issue."
                .to_string()
        } else {
            format!(
                "I understand you're asking about {input}. \
                 Could you provide more details so I can better assist you?"
            )
        }
    }
}

/// One operator's chat session.
///
/// The message log is private to the session; messages arrive through the
/// bus subscription, including the session's own sends.
pub struct ChatSession {
    bus: Arc<EventBus>,
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    subscription: Option<Subscription>,
}

impl ChatSession {
    /// Open a session seeded with the assistant greeting
    pub fn new(bus: Arc<EventBus>) -> Self {
        let messages = Arc::new(Mutex::new(vec![ChatMessage::bot(GREETING)]));

        let messages_cb = Arc::clone(&messages);
        let subscription = bus.subscribe_chat(move |message| {
            messages_cb.lock().push(message.clone());
        });

        Self {
            bus,
            messages,
            subscription: Some(subscription),
        }
    }

    /// Publish an operator message followed by the assistant's reply.
    /// Blank input is ignored.
    pub fn send(&self, content: &str) {
        if content.trim().is_empty() {
            return;
        }

        let user = ChatMessage::user(content);
        self.bus.publish_chat(&user);

        let bot = ChatMessage::bot(&ChatBot::reply(content));
        self.bus.publish_chat(&bot);
    }

    /// Copy of the session's message log
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().clone()
    }

    /// Leave the session; stops receiving bus messages
    pub fn close(&mut self) {
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ChatSender;

    #[test]
    fn replies_match_keywords() {
        assert!(ChatBot::reply("hello there").contains("assist you"));
        assert!(ChatBot::reply("show me the camera").contains("Feeds tab"));
        assert!(ChatBot::reply("any incident today?").contains("Incidents tab"));
        assert!(ChatBot::reply("pollution levels?").contains("water quality"));
        assert!(ChatBot::reply("how do I upload a photo").contains("Report Incident"));
        assert!(ChatBot::reply("xyzzy").contains("more details"));
    }

    #[test]
    fn send_appends_user_then_bot() {
        let bus = Arc::new(EventBus::new());
        let session = ChatSession::new(Arc::clone(&bus));

        session.send("hello");

        let messages = session.messages();
        assert_eq!(messages.len(), 3); // greeting + user + reply
        assert_eq!(messages[0].sender, ChatSender::Bot);
        assert_eq!(messages[1].sender, ChatSender::User);
        assert_eq!(messages[1].content, "hello");
        assert_eq!(messages[2].sender, ChatSender::Bot);
    }

    #[test]
    fn blank_input_is_ignored() {
        let bus = Arc::new(EventBus::new());
        let session = ChatSession::new(Arc::clone(&bus));

        session.send("   ");
        assert_eq!(session.messages().len(), 1);
        assert_eq!(bus.published(), 0);
    }

    #[test]
    fn closed_session_stops_receiving() {
        let bus = Arc::new(EventBus::new());
        let mut session = ChatSession::new(Arc::clone(&bus));
        session.close();

        bus.publish_chat(&ChatMessage::user("anyone there?"));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn sessions_receive_each_other() {
        let bus = Arc::new(EventBus::new());
        let first = ChatSession::new(Arc::clone(&bus));
        let second = ChatSession::new(Arc::clone(&bus));

        first.send("hello from the control room");

        // Both logs got the user message and the reply
        assert_eq!(first.messages().len(), 3);
        assert_eq!(second.messages().len(), 3);
    }
}
