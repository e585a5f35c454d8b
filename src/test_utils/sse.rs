//! Server-sent-events client for `/events`. Standalone so integration tests
//! can include it by path.

/// Minimal server-sent-events consumer for exercising `/events`.
pub struct SseClient {
    response: reqwest::Response,
    buffer: Vec<u8>,
}

impl SseClient {
    pub async fn connect(url: &str) -> Self {
        let response = reqwest::get(url).await.expect("event stream request failed");
        assert!(
            response.status().is_success(),
            "event stream returned {}",
            response.status()
        );
        Self {
            response,
            buffer: Vec::new(),
        }
    }

    /// Next `(event, data)` pair, skipping keep-alive comments. `None` once
    /// the server ends the stream.
    pub async fn next_event(&mut self) -> Option<(String, String)> {
        loop {
            if let Some(end) = self.buffer.windows(2).position(|pair| pair == b"\n\n") {
                let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
                let block = String::from_utf8(block).expect("event stream is not utf-8");
                match parse_event_block(&block) {
                    Some(event) => return Some(event),
                    None => continue,
                }
            }
            let chunk = self
                .response
                .chunk()
                .await
                .expect("event stream read failed")?;
            self.buffer.extend_from_slice(&chunk);
        }
    }

    /// Next `config` payload decoded as JSON.
    pub async fn next_config(&mut self) -> serde_json::Value {
        loop {
            let (event, data) = self.next_event().await.expect("event stream ended");
            if event == "config" {
                return serde_json::from_str(&data).expect("config payload is not json");
            }
        }
    }
}

fn parse_event_block(block: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut data = Vec::new();
    for line in block.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            name = Some(value.trim_start().to_owned());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }
    if name.is_none() && data.is_empty() {
        return None;
    }
    Some((
        name.unwrap_or_else(|| "message".to_owned()),
        data.join("\n"),
    ))
}
