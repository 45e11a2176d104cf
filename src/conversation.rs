use crate::dispatch::{render, Dispatcher};
use crate::intent::IntentService;
use crate::outputs::{ChatMessage, MessageSink};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// One chat panel: understands each line of user input and runs it to
/// completion before the next one is accepted.
pub struct Conversation {
    intents: IntentService,
    dispatcher: Dispatcher,
}

impl Conversation {
    pub fn new(intents: IntentService, dispatcher: Dispatcher) -> Self {
        Self { intents, dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Emits the user echo and a loading placeholder to `sink`, then returns
    /// the final assistant message. Blank input yields `None`.
    pub async fn handle_user_message(&mut self, text: &str, sink: &dyn MessageSink) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let turn = Uuid::new_v4();
        let span = info_span!("turn", id = %turn);
        async move {
            info!("User input: {:?}", text);
            sink.emit(ChatMessage::user(text));
            sink.emit(ChatMessage::loading(render::THINKING));

            let intent = self.intents.understand_intent(text).await;
            Some(self.dispatcher.dispatch(&intent, Some(sink)).await)
        }
        .instrument(span)
        .await
    }
}
