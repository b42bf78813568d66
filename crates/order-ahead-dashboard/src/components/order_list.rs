// crates/order-ahead-dashboard/src/components/order_list.rs

use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{App, OrderStatus};

pub fn draw_order_list(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["Arrives", "Customer", "Items", "Placed", "Status"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app.snapshot.orders.iter().enumerate().map(|(i, order)| {
        let style = if i == app.selected_index {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let status = OrderStatus::of(order);
        let status_style = match status {
            OrderStatus::Arriving => style.fg(Color::Green),
            OrderStatus::Processing => style.fg(Color::Cyan),
            OrderStatus::Expired => style.fg(Color::Red),
        };

        let countdown = if order.is_expired {
            "--:--".to_string()
        } else {
            order.countdown().to_string()
        };
        let customer = order
            .customer_name
            .clone()
            .unwrap_or_else(|| order.key.user_oid.clone());
        let item_count: u32 = order.items.iter().map(|item| item.quantity).sum();

        Row::new(vec![
            Cell::from(countdown).style(status_style),
            Cell::from(customer).style(style),
            Cell::from(item_count.to_string()).style(style),
            Cell::from(order.purchase_date.with_timezone(&Local).format("%H:%M:%S").to_string()).style(style),
            Cell::from(status.label()).style(status_style),
        ])
    }).collect();

    let widths = [
        Constraint::Length(8),  // Countdown
        Constraint::Min(12),    // Customer
        Constraint::Length(5),  // Items
        Constraint::Length(9),  // Placed
        Constraint::Length(11), // Status
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default()
            .title(" Active Orders ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)));

    f.render_widget(table, area);
}
