use std::time::Instant;

use tracing::{Instrument, Span, debug, error, instrument};

use crate::{
    base::types::{ChatMessage, Intent, Void},
    runtime::Runtime,
};

use super::{handlers, transcript};

#[instrument(skip_all)]
pub fn handle_chat_event(message: ChatMessage, runtime: Runtime) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_chat_event(&runtime, message).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
        .in_current_span(),
    );
}

/// Route one message and run the selected handler.
#[instrument(skip_all, fields(channel_id = message.channel_id, author_id = message.author_id, intent = tracing::field::Empty))]
pub async fn process_chat_event(runtime: &Runtime, message: ChatMessage) -> Void {
    let intent = runtime.router.route(&message, runtime.chat.bot_user_id(), &runtime.state, Instant::now(), message.received_at);

    Span::current().record("intent", intent.name());

    if let Intent::Ignore(reason) = &intent {
        debug!("Ignoring message: {:?}", reason);
        return Ok(());
    }

    transcript::record(runtime, &message).await;

    handlers::execute(runtime, &message, intent).await
}
