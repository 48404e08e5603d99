use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use gymdeck_core::utils::truncate;

use crate::app::{App, Focus};
use crate::ui::styles;

/// Width budget for post titles in the feed list
const LIST_TITLE_LEN: usize = 32;

/// Render the Posts tab - feed list with a reading pane
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_post_list(frame, app, chunks[0]);
    render_post_content(frame, app, chunks[1]);
}

fn render_post_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);
    let mut lines = vec![];

    for (i, post) in app.posts.iter().enumerate() {
        let style = if i == app.post_selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };

        lines.push(Line::from(vec![
            Span::styled(truncate(&post.title, LIST_TITLE_LEN), style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(post.date_display(), styles::muted_style()),
            Span::raw("  "),
            Span::styled(post.preview(), styles::muted_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No posts", styles::muted_style())));
    }

    let block = Block::default()
        .title(format!(" Posts ({}) ", app.posts.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_post_content(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.posts.get(app.post_selection);
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(post) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                post.title.clone(),
                styles::title_style(),
            )));
            lines.push(Line::from(vec![
                Span::styled(post.author_display().to_string(), styles::highlight_style()),
                Span::styled(format!("  {}", post.date_display()), styles::muted_style()),
            ]));
            lines.push(Line::from(""));

            for paragraph in post.body_text().split('\n') {
                lines.push(Line::from(Span::raw(paragraph.to_string())));
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "Select a post from the list",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
