use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use gymdeck_core::analytics::{classify, daily_revenue, range_revenue, MembershipStatus};
use gymdeck_core::utils::format_money;

use crate::app::App;
use crate::ui::styles;

use chrono::Datelike;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Vertical layout:
    // 1. Overview stats (full width)
    // 2. Expiring soon | Today's check-ins (50/50)
    // 3. Trainers (full width)
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Percentage(50),
            Constraint::Min(6),
        ])
        .split(area);

    render_overview(frame, app, main_chunks[0]);

    let middle_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    render_expiring(frame, app, middle_chunks[0]);
    render_checkins(frame, app, middle_chunks[1]);

    render_trainers(frame, app, main_chunks[2]);
}

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let today = app.today();

    let mut active = 0usize;
    let mut expiring = 0usize;
    let mut expired = 0usize;
    for member in &app.members {
        match classify(member, today).status {
            MembershipStatus::Active => active += 1,
            MembershipStatus::ExpiringSoon => expiring += 1,
            MembershipStatus::Expired => expired += 1,
        }
    }

    let checkins_today = app.checkins.iter().filter(|c| c.is_on(today)).count();

    let revenue_today = daily_revenue(
        &app.members,
        today,
        today,
        app.config.missing_date_policy,
    );
    let month_start = today.with_day(1).unwrap_or(today);
    let revenue_month = range_revenue(&app.members, month_start, today);

    let lines = vec![
        Line::from(vec![
            Span::styled("Members:        ", styles::muted_style()),
            Span::styled(format!("{}", app.members.len()), styles::list_item_style()),
            Span::styled("   Active: ", styles::muted_style()),
            Span::styled(format!("{}", active), styles::success_style()),
            Span::styled("   Expiring: ", styles::muted_style()),
            Span::styled(format!("{}", expiring), styles::highlight_style()),
            Span::styled("   Expired: ", styles::muted_style()),
            if expired > 0 {
                Span::styled(format!("{}", expired), styles::error_style())
            } else {
                Span::styled("0", styles::success_style())
            },
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Check-ins:      ", styles::muted_style()),
            Span::styled(format!("{} today", checkins_today), styles::list_item_style()),
        ]),
        Line::from(vec![
            Span::styled("Revenue today:  ", styles::muted_style()),
            Span::styled(format_money(revenue_today), styles::highlight_style()),
        ]),
        Line::from(vec![
            Span::styled("Month to date:  ", styles::muted_style()),
            Span::styled(format_money(revenue_month), styles::highlight_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_expiring(frame: &mut Frame, app: &App, area: Rect) {
    let today = app.today();
    let mut lines = vec![];

    // Memberships expiring within the next week, soonest first
    let mut expiring: Vec<(&_, i64)> = app
        .members
        .iter()
        .filter_map(|m| {
            let c = classify(m, today);
            (c.status == MembershipStatus::ExpiringSoon).then_some((m, c.days_remaining))
        })
        .collect();
    expiring.sort_by_key(|&(_, days)| days);

    let name_width = expiring
        .iter()
        .map(|(m, _)| m.display_name().len())
        .max()
        .unwrap_or(0)
        + 2;

    for (member, days) in &expiring {
        let when = match days {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            d => format!("in {} days", d),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", member.display_name(), width = name_width),
                styles::list_item_style(),
            ),
            Span::styled(when, styles::highlight_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No memberships expiring this week",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Expiring Soon ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_checkins(frame: &mut Frame, app: &App, area: Rect) {
    let today = app.today();
    let mut lines = vec![];

    let mut todays: Vec<&_> = app.checkins.iter().filter(|c| c.is_on(today)).collect();
    // Latest first
    todays.sort_by(|a, b| b.checked_in_at.cmp(&a.checked_in_at));

    for checkin in &todays {
        lines.push(Line::from(vec![
            Span::styled(checkin.time_display(), styles::muted_style()),
            Span::raw("  "),
            Span::styled(checkin.name_display().to_string(), styles::list_item_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No check-ins yet today",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" Check-ins - {} ", today.format("%b %d, %Y")))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_trainers(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    let name_width = app
        .trainers
        .iter()
        .map(|t| t.full_name().len())
        .max()
        .unwrap_or(0)
        + 2;

    for trainer in &app.trainers {
        let phone = trainer.phone_display().unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", trainer.full_name(), width = name_width),
                styles::list_item_style(),
            ),
            Span::styled(
                format!("{:<20}", trainer.specialty_display()),
                styles::highlight_style(),
            ),
            Span::styled(phone, styles::muted_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No trainer data",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" Trainers ({}) ", app.trainers.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
