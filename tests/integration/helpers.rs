use chatview::config::ViewportConfig;
use chatview::model::{MessageItem, MessageRole};
use chatview::viewport::{
    ChatViewport, ContentChunk, ListChange, MessageRenderer, RenderedMessage, VisibleBlock,
};
use std::time::{Duration, Instant};

pub const FRAME: Duration = Duration::from_millis(16);

pub fn short_message(index: usize) -> MessageItem {
    let role = if index % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
    MessageItem::new(format!("m{index}"), role, "hi").at_index(index)
}

pub fn transcript(count: usize) -> Vec<MessageItem> {
    (0..count).map(short_message).collect()
}

/// A viewport, the transcript it shows, and a virtual clock.
/// No terminal -- frames are advanced by hand.
pub struct Rig {
    pub viewport: ChatViewport,
    pub messages: Vec<MessageItem>,
    pub now: Instant,
}

impl Rig {
    pub fn new(viewport_height: f32) -> Self {
        let now = Instant::now();
        let mut viewport = ChatViewport::new(ViewportConfig::default()).unwrap();
        viewport.on_resize(now, viewport_height);
        Self { viewport, messages: Vec::new(), now }
    }

    /// `count` short messages, loaded at once and settled on the tail.
    pub fn settled(viewport_height: f32, count: usize) -> Self {
        let mut rig = Self::new(viewport_height);
        rig.messages = transcript(count);
        rig.sync();
        rig.settle();
        rig
    }

    pub fn sync(&mut self) -> ListChange {
        self.viewport.sync_messages(&self.messages, self.now)
    }

    pub fn push(&mut self, message: MessageItem) -> ListChange {
        self.messages.push(message);
        self.sync()
    }

    pub fn grow_last(&mut self, tokens: &str) -> ListChange {
        if let Some(last) = self.messages.last_mut() {
            last.push_str(tokens);
        }
        self.sync()
    }

    pub fn render(&mut self, renderer: &mut LengthRenderer) -> Vec<VisibleBlock<String>> {
        self.viewport.render_visible(&self.messages, renderer, self.now)
    }

    pub fn frames(&mut self, count: u32) {
        for _ in 0..count {
            self.now += FRAME;
            self.viewport.tick(self.now);
        }
    }

    /// About one second of frames: longer than any animation.
    pub fn settle(&mut self) {
        self.frames(63);
    }

    pub fn at_tail(&self) -> bool {
        (self.viewport.scroll_top() - self.viewport.max_scroll_top()).abs() < 0.5
    }
}

/// Height is a fixed base plus one unit per ten visible characters.
pub struct LengthRenderer {
    pub base: f32,
}

impl MessageRenderer for LengthRenderer {
    type Block = String;

    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, _message: &MessageItem, chunks: &[ContentChunk]) -> RenderedMessage<String> {
        let text: String =
            chunks.iter().filter(|c| c.is_visible).map(|c| c.content.as_str()).collect();
        let height = self.base + (text.chars().count() / 10) as f32;
        RenderedMessage { block: text, height }
    }
}
