use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use gymdeck_core::utils::format_money;

use crate::app::{App, Focus};
use crate::ui::styles;

/// Render the Shop tab - product table with a detail/order pane
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_product_table(frame, app, chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_product_detail(frame, app, right_chunks[0]);
    render_order_history(frame, app, right_chunks[1]);
}

fn render_product_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Product"),
        Cell::from("Category"),
        Cell::from("Price"),
        Cell::from("Stock"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .products
        .iter()
        .map(|product| {
            let stock_style = if product.in_stock() {
                styles::list_item_style()
            } else {
                styles::error_style()
            };

            Row::new(vec![
                Cell::from(product.name.clone()),
                Cell::from(product.category_display().to_string()),
                Cell::from(format!("{:>9}", format_money(product.price_value()))),
                Cell::from(format!("{:>5}", product.stock_display())).style(stock_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(6),
    ];

    let title = format!(" Shop ({}) - Enter to buy ", app.products.len());

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
    state.select(Some(app.product_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_product_detail(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.products.get(app.product_selection);

    let content = match selected {
        Some(product) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                product.name.clone(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("Category: ", styles::muted_style()),
                Span::raw(product.category_display().to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Price:    ", styles::muted_style()),
                Span::styled(format_money(product.price_value()), styles::highlight_style()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Stock:    ", styles::muted_style()),
                if product.in_stock() {
                    Span::styled(product.stock_display(), styles::success_style())
                } else {
                    Span::styled("out of stock".to_string(), styles::error_style())
                },
            ]));

            if let Some(ref description) = product.description {
                if !description.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::raw(description.clone())));
                }
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "No product selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Product ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_order_history(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    for order in &app.orders {
        let code_style = if order.offline {
            styles::highlight_style()
        } else {
            styles::success_style()
        };

        lines.push(Line::from(vec![
            Span::styled(order.code_display().to_string(), code_style),
            Span::raw(" "),
            Span::styled(
                format!("{} x{}", order.product_name, order.quantity),
                styles::list_item_style(),
            ),
        ]));

        let placed = order.placed_at.format("%b %d, %Y %H:%M").to_string();
        let offline_note = if order.offline { "  local" } else { "" };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format_money(order.total), styles::muted_style()),
            Span::styled(format!("  {}{}", placed, offline_note), styles::muted_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No orders yet",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" Orders ({}) ", app.orders.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
