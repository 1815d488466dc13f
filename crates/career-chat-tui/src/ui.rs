use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use career_chat_core::Role;
use unicode_width::UnicodeWidthChar;
use crate::app::App;

const TITLE: &str = " キャリアカウンセラーAI ";
const SUBTITLE: &str = "あなたのキャリアに関する質問や相談に答えます";
const PLACEHOLDER: &str = "メッセージを入力...";
const EXAMPLE_QUESTIONS: [&str; 3] = [
    "「IT業界に転職するにはどうしたらいいですか？」",
    "「プログラミングのキャリアを始めるにはどの言語がおすすめですか？」",
    "「履歴書の書き方のアドバイスをください」",
];

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let conversation = app
        .controller
        .transcript()
        .conversation_id()
        .map(|id| format!(" #{}", id))
        .unwrap_or_default();

    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()),
        Span::styled(conversation, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn role_label(role: Role) -> Span<'static> {
    let (label, color) = match role {
        Role::User => ("あなた:", Color::Cyan),
        Role::Assistant => ("カウンセラー:", Color::Yellow),
        Role::System => ("システム:", Color::Red),
    };
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn welcome_text() -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled("ようこそ！", Style::default().fg(Color::Cyan).bold())),
        Line::default(),
        Line::from(SUBTITLE),
        Line::from("キャリアに関する質問や悩みを入力してください。"),
        Line::default(),
        Line::from("例："),
    ];
    lines.extend(
        EXAMPLE_QUESTIONS
            .iter()
            .map(|q| Line::from(Span::styled(format!("  • {}", q), Style::default().fg(Color::DarkGray)))),
    );
    Text::from(lines)
}

/// Transcript as drawn in the chat pane: each message under its role label,
/// or the welcome panel before the first message.
pub fn transcript_text(app: &App) -> Text<'static> {
    let transcript = app.controller.transcript();
    if transcript.is_empty() && !app.is_pending() {
        return welcome_text();
    }

    let mut lines: Vec<Line> = Vec::new();

    for msg in transcript.messages() {
        lines.push(Line::from(role_label(msg.role)));
        let style = match msg.role {
            Role::System => Style::default().fg(Color::Red),
            _ => Style::default(),
        };
        for line in msg.content.lines() {
            lines.push(Line::styled(line.to_string(), style));
        }
        lines.push(Line::default());
    }

    if app.is_pending() {
        lines.push(Line::from(role_label(Role::Assistant)));
        // Animated typing indicator: one to three dots
        let dots = "●".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            dots,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Text::from(lines)
}

/// Transcript paragraph without its border, wrapped the way it is drawn.
pub fn transcript_paragraph(app: &App) -> Paragraph<'static> {
    Paragraph::new(transcript_text(app)).wrap(Wrap { trim: false })
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and inner size for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.client.base_url()));

    let chat = transcript_paragraph(app)
        .block(block)
        .scroll((app.scroll, 0));

    frame.render_widget(chat, area);
}

/// Slice of `input` that fits in `width` columns with the cursor visible,
/// and the cursor's column within that slice.
pub fn visible_input(input: &str, cursor: usize, width: usize) -> (String, u16) {
    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let char_width = |c: &char| c.width().unwrap_or(0);

    // Drop leading chars until the cursor (plus one cell for it) fits
    let mut start = 0;
    let mut before_cursor: usize = chars[..cursor].iter().map(char_width).sum();
    while start < cursor && before_cursor + 1 > width {
        before_cursor -= char_width(&chars[start]);
        start += 1;
    }

    let mut used = 0;
    let visible: String = chars[start..]
        .iter()
        .take_while(|c| {
            used += char_width(*c);
            used <= width
        })
        .collect();

    (visible, before_cursor as u16)
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let pending = app.is_pending();
    let border_color = if pending { Color::DarkGray } else { Color::Yellow };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(if pending { " 送信中... " } else { " メッセージ " });

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;

    if app.input.is_empty() {
        let placeholder = Paragraph::new(PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
    } else {
        let (visible_text, _) = visible_input(&app.input, app.cursor, inner_width);
        let style = if pending {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        frame.render_widget(Paragraph::new(visible_text).style(style).block(block), area);
    }

    // Show cursor only while input is accepted
    if !pending {
        let (_, cursor_x) = visible_input(&app.input, app.cursor, inner_width);
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = Vec::new();
    if !app.is_pending() {
        hints.extend([
            Span::styled(" Enter ", key_style),
            Span::styled(" 送信 ", label_style),
        ]);
    }
    hints.extend([
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" スクロール ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" 終了 ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_chat_core::{ApiClient, ChatResponse, Message, FAILURE_MESSAGE};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        draw_sized(app, 60, 20)
    }

    fn draw_sized(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        App::new(ApiClient::new("http://localhost:8000"))
    }

    #[test]
    fn test_renders_transcript_entries() {
        let mut app = app();
        app.controller.begin("How do I move into data science?").unwrap();
        app.controller.resolve(Ok(ChatResponse {
            conversation_id: "abc123".to_string(),
            messages: None,
            message: Some("Start with statistics.".to_string()),
            metadata: None,
        }));

        let screen = draw(&mut app);

        assert!(screen.contains("How do I move into data science?"));
        assert!(screen.contains("Start with statistics."));
        assert!(screen.contains("#abc123"));
        assert!(screen.contains("http://localhost:8000"));
    }

    #[test]
    fn test_renders_failure_notice() {
        let mut app = app();
        app.controller.begin("hello").unwrap();
        app.controller
            .resolve(Err(anyhow::anyhow!("connection refused")));

        // Full-width text is padded per cell, so compare without blanks
        let screen: String = draw(&mut app).chars().filter(|c| *c != ' ').collect();
        let expected: String = FAILURE_MESSAGE.chars().filter(|c| *c != ' ').collect();
        assert!(screen.contains(&expected));
    }

    #[test]
    fn test_pending_shows_indicator_and_hides_send_hint() {
        let mut app = app();
        app.controller.begin("hello").unwrap();

        let screen = draw(&mut app);

        assert!(screen.contains("●"));
        assert!(!screen.contains("Enter"));
        assert!(screen.contains("Esc"));
    }

    #[test]
    fn test_render_records_chat_geometry() {
        let mut app = app();
        draw(&mut app);

        // 20 rows minus header, input and footer
        assert_eq!(app.chat_area, Some(Rect::new(0, 1, 60, 15)));
        assert_eq!(app.chat_height, 13);
        assert_eq!(app.chat_width, 58);
    }

    #[test]
    fn test_scroll_to_bottom_reaches_word_wrapped_reply() {
        let mut app = app();
        app.controller.begin("hi").unwrap();
        app.controller.resolve(Ok(ChatResponse {
            conversation_id: "abc123".to_string(),
            messages: Some(vec![Message::user("aaaaaa bbbbbb cccccc dddddd")]),
            message: None,
            metadata: None,
        }));

        // 12 columns leave a 10 column pane, so each word gets its own row
        let screen = draw_sized(&mut app, 12, 10);
        assert!(!screen.contains("dddddd"));

        app.scroll_to_bottom();
        let screen = draw_sized(&mut app, 12, 10);
        assert!(screen.contains("dddddd"));
    }

    #[test]
    fn test_visible_input_fits_short_text() {
        assert_eq!(visible_input("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(visible_input("hello", 0, 10), ("hello".to_string(), 0));
    }

    #[test]
    fn test_visible_input_scrolls_to_cursor() {
        let (text, cursor_x) = visible_input("abcdefghij", 10, 5);
        assert_eq!(text, "ghij");
        assert_eq!(cursor_x, 4);
    }

    #[test]
    fn test_visible_input_counts_wide_characters() {
        // Each kana is two columns wide
        let (text, cursor_x) = visible_input("あいうえお", 5, 6);
        assert_eq!(text, "えお");
        assert_eq!(cursor_x, 4);

        let (text, cursor_x) = visible_input("あいうえお", 1, 6);
        assert_eq!(text, "あいう");
        assert_eq!(cursor_x, 2);
    }
}
