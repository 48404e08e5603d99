use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use gymdeck_core::analytics::classify;
use gymdeck_core::models::{Member, MemberSortColumn};
use gymdeck_core::utils::{format_date, format_money};

use crate::app::{App, Focus};
use crate::ui::styles;

/// Render the Members tab - table with sortable columns
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_member_table(frame, app, chunks[0]);
    render_member_detail(frame, app, chunks[1]);
}

fn render_member_table(frame: &mut Frame, app: &App, area: Rect) {
    let members = app.visible_members();
    let today = app.today();
    let focused = matches!(app.focus, Focus::List);

    // Build header with sort indicators
    let sort_indicator = |col: MemberSortColumn| {
        if app.member_sort_column == col {
            if app.member_sort_ascending { " ▲" } else { " ▼" }
        } else {
            ""
        }
    };

    let header_cells = [
        Cell::from(format!("Name{}", sort_indicator(MemberSortColumn::Name))),
        Cell::from(format!("Type{}", sort_indicator(MemberSortColumn::Type))),
        Cell::from(format!("Fee{}", sort_indicator(MemberSortColumn::Fee))),
        Cell::from(format!("Status{}", sort_indicator(MemberSortColumn::Status))),
        Cell::from(format!("Expires{}", sort_indicator(MemberSortColumn::Expiry))),
    ];

    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    // Build rows
    let rows: Vec<Row> = members
        .iter()
        .map(|member| {
            let classification = classify(member, today);
            let expiry = member
                .expiry()
                .map(|d| d.format("%b %d, %Y").to_string())
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(member.display_name()),
                Cell::from(member.membership_type_display().to_string()),
                Cell::from(format!("{:>9}", format_money(member.fee()))),
                Cell::from(classification.status.label())
                    .style(styles::status_style(classification.status)),
                Cell::from(expiry),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(34), // Name
        Constraint::Fill(2),        // Type
        Constraint::Length(10),     // Fee
        Constraint::Length(9),      // Status
        Constraint::Length(13),     // Expires
    ];

    let sort_help = "[n]ame [t]ype [f]ee [s]tatus [e]xpiry";
    let title = if app.search_query.is_empty() {
        format!(" Members ({}) - {} ", app.members.len(), sort_help)
    } else {
        format!(
            " Members ({}/{}) - \"{}\" ",
            members.len(),
            app.members.len(),
            app.search_query
        )
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.member_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_member_detail(frame: &mut Frame, app: &App, area: Rect) {
    let members = app.visible_members();
    let selected = members.get(app.member_selection);
    let focused = matches!(app.focus, Focus::Detail);
    let today = app.today();

    let content = match selected {
        Some(member) => member_detail_lines(member, today),
        None => vec![Line::from(Span::styled(
            "No member selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn member_detail_lines(member: &Member, today: chrono::NaiveDate) -> Vec<Line<'static>> {
    let placeholder = "-";
    let mut lines = vec![];

    lines.push(Line::from(Span::styled(
        member.full_name(),
        styles::title_style(),
    )));
    lines.push(Line::from(""));

    // Membership section
    lines.push(Line::from(Span::styled(
        "Membership",
        styles::highlight_style(),
    )));

    lines.push(Line::from(vec![
        Span::styled("Type:       ", styles::muted_style()),
        Span::raw(member.membership_type_display().to_string()),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Fee:        ", styles::muted_style()),
        Span::raw(format!("{}/month", format_money(member.fee()))),
    ]));

    let classification = classify(member, today);
    lines.push(Line::from(vec![
        Span::styled("Status:     ", styles::muted_style()),
        Span::styled(
            classification.status_display(member.expiry().is_some()),
            styles::status_style(classification.status),
        ),
    ]));

    let expiry = member
        .expiry()
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| placeholder.to_string());
    lines.push(Line::from(vec![
        Span::styled("Expires:    ", styles::muted_style()),
        Span::raw(expiry),
    ]));

    // Enrollment date with the field it was resolved from
    let enrolled = match (member.enrollment_date(), member.enrollment_source()) {
        (Some(date), Some(source)) => {
            format!("{} (from {})", date.format("%b %d, %Y"), source)
        }
        (None, Some(source)) => format!("unparseable {}", source),
        _ => placeholder.to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Enrolled:   ", styles::muted_style()),
        Span::raw(enrolled),
    ]));

    lines.push(Line::from(""));

    // Contact section
    lines.push(Line::from(Span::styled("Contact", styles::highlight_style())));

    let phone = member
        .phone_display()
        .unwrap_or_else(|| placeholder.to_string());
    lines.push(Line::from(vec![
        Span::styled("Phone:      ", styles::muted_style()),
        Span::raw(phone),
    ]));

    let email = member
        .email_display()
        .unwrap_or(placeholder)
        .to_string();
    lines.push(Line::from(vec![
        Span::styled("Email:      ", styles::muted_style()),
        Span::raw(email),
    ]));

    if let Some(ref created) = member.created_at {
        lines.push(Line::from(vec![
            Span::styled("Registered: ", styles::muted_style()),
            Span::raw(format_date(created)),
        ]));
    }

    lines
}
