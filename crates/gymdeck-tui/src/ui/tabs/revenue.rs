use chrono::{Datelike, Duration, Weekday};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use gymdeck_core::analytics::{
    by_type, daily_revenue, monthly_trend, period_comparison, TREND_MONTHS,
};
use gymdeck_core::utils::format_money;

use crate::app::App;
use crate::ui::styles;

/// Width of the bars in the monthly trend chart
const TREND_BAR_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Vertical layout:
    // 1. Daily revenue (today vs yesterday)
    // 2. Month-to-date comparison
    // 3. Monthly trend | By membership type (50/50)
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Min(8),
        ])
        .split(area);

    render_daily(frame, app, main_chunks[0]);
    render_month_comparison(frame, app, main_chunks[1]);

    let bottom_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[2]);

    render_trend(frame, app, bottom_chunks[0]);
    render_breakdown(frame, app, bottom_chunks[1]);
}

fn is_weekend(date: chrono::NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn render_daily(frame: &mut Frame, app: &App, area: Rect) {
    let today = app.today();
    let yesterday = today - Duration::days(1);
    let policy = app.config.missing_date_policy;

    let today_revenue = daily_revenue(&app.members, today, today, policy);
    let yesterday_revenue = daily_revenue(&app.members, yesterday, today, policy);

    let surcharge_note = |date: chrono::NaiveDate| {
        if is_weekend(date) {
            "  (weekend rate)"
        } else {
            ""
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Today ({}):      ", today.format("%a %b %d")),
                styles::muted_style(),
            ),
            Span::styled(format_money(today_revenue), styles::highlight_style()),
            Span::styled(surcharge_note(today), styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("Yesterday ({}):  ", yesterday.format("%a %b %d")),
                styles::muted_style(),
            ),
            Span::styled(format_money(yesterday_revenue), styles::list_item_style()),
            Span::styled(surcharge_note(yesterday), styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("Policy: {}", policy.label()),
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" Daily Revenue ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_month_comparison(frame: &mut Frame, app: &App, area: Rect) {
    let today = app.today();
    let month_start = today.with_day(1).unwrap_or(today);

    // Month to date against the immediately preceding window of equal length
    let comparison = period_comparison(&app.members, month_start, today);

    let change_span = if comparison.previous == 0.0 {
        Span::styled("n/a (no previous revenue)", styles::muted_style())
    } else {
        let style = if comparison.percent_change >= 0.0 {
            styles::success_style()
        } else {
            styles::error_style()
        };
        Span::styled(format!("{:+.1}%", comparison.percent_change), style)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Month to date:    ", styles::muted_style()),
            Span::styled(format_money(comparison.current), styles::highlight_style()),
        ]),
        Line::from(vec![
            Span::styled("Previous period:  ", styles::muted_style()),
            Span::styled(format_money(comparison.previous), styles::list_item_style()),
        ]),
        Line::from(vec![
            Span::styled("Change:           ", styles::muted_style()),
            change_span,
        ]),
    ];

    let block = Block::default()
        .title(" Period Comparison ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_trend(frame: &mut Frame, app: &App, area: Rect) {
    let trend = monthly_trend(&app.members, app.today(), TREND_MONTHS);
    let max = trend.iter().map(|m| m.revenue).fold(0.0_f64, f64::max);

    let mut lines = vec![];
    for month in &trend {
        let filled = if max > 0.0 {
            ((month.revenue / max) * TREND_BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar: String = "█".repeat(filled);

        lines.push(Line::from(vec![
            Span::styled(format!("{:<9}", month.label), styles::muted_style()),
            Span::styled(format!("{:<width$}", bar, width = TREND_BAR_WIDTH), styles::highlight_style()),
            Span::styled(format!(" {:>10}", format_money(month.revenue)), styles::list_item_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No data", styles::muted_style())));
    }

    let block = Block::default()
        .title(format!(" Monthly Trend ({} months) ", TREND_MONTHS))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_breakdown(frame: &mut Frame, app: &App, area: Rect) {
    let breakdown = by_type(&app.members);

    let header = Row::new([
        Cell::from("Type"),
        Cell::from("Members"),
        Cell::from("Monthly Total"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = breakdown
        .iter()
        .map(|group| {
            Row::new(vec![
                Cell::from(group.membership_type.clone()),
                Cell::from(format!("{:>7}", group.count)),
                Cell::from(format!("{:>13}", format_money(group.total_fee))),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(8),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" By Membership Type ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}
