use anyhow::anyhow;
use career_chat_core::{ApiClient, ChatBackend, ChatController, ChatResponse};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;

pub struct App {
    pub should_quit: bool,

    // Conversation state (owned by the controller, rendered read-only)
    pub controller: ChatController,
    pub client: ApiClient,
    pub send_task: Option<JoinHandle<anyhow::Result<ChatResponse>>>,

    // Input box
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Transcript scrolling
    pub scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing indicator

    // Panel area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        Self {
            should_quit: false,
            controller: ChatController::new(),
            client,
            send_task: None,
            input: String::new(),
            cursor: 0,
            scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            chat_area: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Hand the input to the controller and dispatch the request in the
    /// background. The input is only cleared if the submission was accepted.
    pub fn submit(&mut self) {
        match self.controller.begin(&self.input) {
            Ok(request) => {
                self.input.clear();
                self.cursor = 0;

                let client = self.client.clone();
                self.send_task = Some(tokio::spawn(async move { client.chat(&request).await }));

                // Scroll to bottom so the typing indicator is visible
                self.scroll_to_bottom();
            }
            Err(rejection) => {
                tracing::debug!(?rejection, "submission ignored");
            }
        }
    }

    /// Reconcile the outstanding request once it has settled.
    pub async fn poll_send_task(&mut self) {
        let finished = self.send_task.as_ref().is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.send_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => Err(anyhow!("chat task ended abnormally: {}", err)),
            };
            let outcome = self.controller.resolve(result);
            tracing::debug!(?outcome, "request settled");
            self.scroll_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn page_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Scroll the transcript so its last line (or the typing indicator) is visible
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    fn max_scroll(&self) -> u16 {
        self.total_chat_lines().saturating_sub(self.page_height())
    }

    /// Wrapped height of the transcript, measured the way the pane renders it
    fn total_chat_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };

        let lines = crate::ui::transcript_paragraph(self).line_count(wrap_width);
        u16::try_from(lines).unwrap_or(u16::MAX)
    }
}
