//! One-shot question mode
//!
//! Submits a single question and writes the reply to `out` as fragments
//! arrive. Stream failures print the apology, the same way the widget shows
//! them in the transcript.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use folio_chat_core::{ChatWidget, LlmBackend, StreamUpdate};

/// Ask one question and stream the reply into `out`
pub async fn run_ask<B, W>(
    widget: &mut ChatWidget<B>,
    question: &str,
    out: &mut W,
) -> anyhow::Result<()>
where
    B: LlmBackend,
    W: AsyncWrite + Unpin,
{
    widget
        .submit(question)
        .await
        .map_err(|e| anyhow::anyhow!("question not sent: {e}"))?;

    if !widget.is_streaming() {
        // The stream never opened; the apology is already the last message
        if let Some(msg) = widget.transcript().last() {
            out.write_all(msg.text.as_bytes()).await?;
        }
    }

    while let Some(update) = widget.next_update().await {
        match update {
            StreamUpdate::Fragment(text) => {
                out.write_all(text.as_bytes()).await?;
                out.flush().await?;
            }
            StreamUpdate::Finished => {}
            StreamUpdate::Failed(_) => {
                let apology = format!("\n{}", widget.settings().persona.apology);
                out.write_all(apology.as_bytes()).await?;
            }
        }
    }

    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
