use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::protocol::Message;
use crate::transport::Transport;

/// In-process transport. Messages sent on one end of a pair arrive at the
/// other in order; `recv` fails once the peer has been dropped.
pub struct InMemoryTransport {
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (Self { tx: tx1, rx: rx2 }, Self { tx: tx2, rx: rx1 })
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_order_then_closes() -> anyhow::Result<()> {
        let (mut a, mut b) = InMemoryTransport::pair();
        a.send(Message::AvailableGames).await?;
        a.send(Message::Hello { version: 1 }).await?;
        assert_eq!(b.recv().await?, Message::AvailableGames);
        assert_eq!(b.recv().await?, Message::Hello { version: 1 });
        drop(a);
        assert!(b.recv().await.is_err());
        Ok(())
    }
}
