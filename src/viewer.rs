use std::time::Duration;

use async_trait::async_trait;

use crate::snapshot::StateSnapshot;
use crate::supervisor::{GraphicViewer, RenderError};

/// Anything a game loop can hand table snapshots to.
#[async_trait]
pub trait PokerViewer: Send {
    fn num_players(&self) -> usize;

    fn num_hole_cards(&self) -> usize;

    fn num_community_cards(&self) -> usize;

    async fn render(&mut self, snapshot: &StateSnapshot) -> Result<(), RenderError>;

    /// Render, then hold the frame for `pause` so a human can follow along.
    async fn render_with_pause(
        &mut self,
        snapshot: &StateSnapshot,
        pause: Duration,
    ) -> Result<(), RenderError> {
        self.render(snapshot).await?;
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), RenderError>;
}

#[async_trait]
impl PokerViewer for GraphicViewer {
    fn num_players(&self) -> usize {
        self.config().scene.num_players
    }

    fn num_hole_cards(&self) -> usize {
        self.config().scene.num_hole_cards
    }

    fn num_community_cards(&self) -> usize {
        self.config().scene.num_community_cards
    }

    async fn render(&mut self, snapshot: &StateSnapshot) -> Result<(), RenderError> {
        GraphicViewer::render(self, snapshot).await
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        GraphicViewer::close(self).await
    }
}
