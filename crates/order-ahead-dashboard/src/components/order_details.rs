// crates/order-ahead-dashboard/src/components/order_details.rs

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, OrderStatus};

pub fn draw_order_details(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Details ").borders(Borders::ALL);

    let lines = match app.selected_order() {
        None => vec![Line::from(Span::styled(
            "No active orders",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(order) if !order.show_details => vec![
            Line::from(format!("Order {}", order.key.transaction_oid)),
            Line::from(Span::styled(
                "[Enter] show details",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        Some(order) => {
            let purchased = order.purchase_date.with_timezone(&Local);
            let arriving = order.arrival_date.with_timezone(&Local);

            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Order {}", order.key.transaction_oid),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Customer: {}", order.key.user_oid)),
                Line::from(format!(
                    "Placed:   {} {}",
                    purchased.format("%Y-%m-%d"),
                    purchased.format("%H:%M:%S")
                )),
                Line::from(format!(
                    "Arrives:  {} (eta {} min)",
                    arriving.format("%H:%M:%S"),
                    order.eta_minutes
                )),
                Line::from(format!("Status:   {}", OrderStatus::of(order).label())),
                Line::from(""),
            ];

            if let Some(name) = &order.customer_name {
                lines.insert(2, Line::from(format!("Name:     {}", name)));
            }

            for item in &order.items {
                lines.push(Line::from(format!("  {} x {}", item.quantity, item.name)));
            }
            if let Some(total) = order.total {
                lines.push(Line::from(format!("Total: {:.2}", total)));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
