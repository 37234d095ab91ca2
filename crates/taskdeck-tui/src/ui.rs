use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use taskdeck_api::{TaskPriority, TaskStatus};

use crate::app::{App, AuthField, InputMode, Screen};

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Login => draw_auth_screen(frame, app, AuthScreenStyle::login()),
        Screen::Signup => draw_auth_screen(frame, app, AuthScreenStyle::signup()),
        Screen::Tasks => draw_tasks_screen(frame, app),
    }

    if app.show_help {
        draw_help_popup(frame);
    }

    // Draw error popup if there's an error
    if let Some(error) = &app.error_message {
        draw_error_popup(frame, error);
    }
}

struct AuthScreenStyle {
    title: &'static str,
    color: Color,
    submit_hint: &'static str,
    secondary_hint: Vec<(&'static str, Color, &'static str)>,
    busy_hint: &'static str,
}

impl AuthScreenStyle {
    fn login() -> Self {
        Self {
            title: " Login ",
            color: Color::Cyan,
            submit_hint: " to login",
            secondary_hint: vec![
                ("Ctrl+S", Color::Magenta, " to create a new account | "),
                ("Esc", Color::Red, " to quit"),
            ],
            busy_hint: "Signing in...",
        }
    }

    fn signup() -> Self {
        Self {
            title: " Create Account ",
            color: Color::Green,
            submit_hint: " to create the account",
            secondary_hint: vec![("Esc", Color::Red, " to go back to login")],
            busy_hint: "Creating account...",
        }
    }
}

fn draw_auth_screen(frame: &mut Frame, app: &App, style: AuthScreenStyle) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(frame.area());

    let auth_block = Block::default()
        .title(style.title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(style.color));

    frame.render_widget(auth_block.clone(), chunks[1]);

    let inner_area = auth_block.inner(chunks[1]);
    let auth_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Username field
            Constraint::Length(1), // Spacing
            Constraint::Length(2), // Password field
            Constraint::Length(1), // Spacing
            Constraint::Min(0),    // Instructions
        ])
        .split(inner_area);

    draw_auth_field(
        frame,
        auth_chunks[0],
        "Username",
        &app.auth_username_input,
        app.auth_field_focus == AuthField::Username,
    );

    let password_display = "*".repeat(app.auth_password_input.len());
    draw_auth_field(
        frame,
        auth_chunks[2],
        "Password",
        &password_display,
        app.auth_field_focus == AuthField::Password,
    );

    let mut lines = vec![Line::from("")];
    if app.auth_in_flight {
        lines.push(Line::from(Span::styled(
            style.busy_hint,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled(
                "Tab",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to switch fields | "),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(style.submit_hint),
        ]));

        let mut secondary = vec![Span::raw("Press ")];
        for (key, color, rest) in &style.secondary_hint {
            secondary.push(Span::styled(
                *key,
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            ));
            secondary.push(Span::raw(*rest));
        }
        lines.push(Line::from(secondary));
    }

    let instructions = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, auth_chunks[4]);

    // Set cursor position in the focused field
    let (field_area, input_len) = match app.auth_field_focus {
        AuthField::Username => (auth_chunks[0], app.auth_username_input.len()),
        AuthField::Password => (auth_chunks[2], app.auth_password_input.len()),
    };
    frame.set_cursor_position((field_area.x + 10 + input_len as u16, field_area.y));
}

fn draw_auth_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let field_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let field = Paragraph::new(format!("{}: {}", label, value)).style(field_style);
    frame.render_widget(field, area);

    let underline = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        underline,
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: 1,
        },
    );
}

fn draw_tasks_screen(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // New-task input
            Constraint::Length(1), // Filter line
            Constraint::Min(0),    // Task list
            Constraint::Length(2), // Key hints
        ])
        .split(frame.area());

    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick);
    let header_area = header_block.inner(chunks[0]);
    frame.render_widget(header_block, chunks[0]);

    let title = Paragraph::new(" taskdeck ")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, header_area);

    let logout_hint = Paragraph::new("L logout ")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(logout_hint, header_area);

    draw_input(frame, app, chunks[1]);
    draw_filter_line(frame, app, chunks[2]);
    draw_task_list(frame, app, chunks[3]);

    let hints = Paragraph::new(
        "a add | Space toggle | p priority | d delete | s/f filters | ? help | q quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(hints, chunks[4]);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;

    let title = if app.create_in_flight {
        " New task (saving...) "
    } else {
        " New task "
    };

    let input_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(if editing {
            BorderType::Double
        } else {
            BorderType::Rounded
        })
        .style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let content = if editing || !app.input.is_empty() {
        app.input.as_str()
    } else {
        "Press 'a' to add a task"
    };

    let input = Paragraph::new(content)
        .style(if editing {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(input_block);
    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((area.x + 1 + app.input.len() as u16, area.y + 1));
    }
}

fn draw_filter_line(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(area);

    let filters = Line::from(vec![
        Span::raw(" Status: "),
        Span::styled(
            format!("[{}]", app.list.filter_status().as_str()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Priority: "),
        Span::styled(
            format!("[{}]", app.list.filter_priority().as_str()),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(filters), columns[0]);

    let count = Paragraph::new(format!("{}/{} tasks ", app.list.filtered().len(), app.list.len()))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(count, columns[1]);
}

fn draw_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let list_block = Block::default()
        .title(" Tasks ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let filtered = app.list.filtered();

    if filtered.is_empty() {
        let message = if app.list.is_empty() {
            "No tasks yet. Press 'a' to add one."
        } else {
            "No tasks match the current filters."
        };
        let empty = Paragraph::new(message)
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .block(list_block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|task| {
            let marker = match task.status {
                TaskStatus::Pending => "[ ] ",
                TaskStatus::Complete => "[x] ",
            };

            let text_style = match task.status {
                TaskStatus::Pending => Style::default().fg(Color::White),
                TaskStatus::Complete => Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            };

            let priority_color = match task.priority {
                TaskPriority::High => Color::Red,
                TaskPriority::Medium => Color::Yellow,
                TaskPriority::Low => Color::Green,
            };

            let mut line = vec![
                Span::raw(marker),
                Span::styled(task.text.clone(), text_style),
                Span::styled(
                    format!("  ({})", task.priority),
                    Style::default().fg(priority_color),
                ),
            ];

            let mut style = Style::default();
            if app.busy.contains(&task.id) {
                // Row has a request pending; input on it is ignored.
                style = style.add_modifier(Modifier::DIM);
                line.push(Span::styled(
                    "  ...",
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(Line::from(line)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![key("  a        "), Span::raw("add a new task")]),
        Line::from(vec![key("  Space    "), Span::raw("toggle pending/complete")]),
        Line::from(vec![key("  p        "), Span::raw("cycle priority of selected task")]),
        Line::from(vec![key("  d        "), Span::raw("delete selected task")]),
        Line::from(vec![key("  Up/Down  "), Span::raw("move selection")]),
        Line::from(vec![key("  s        "), Span::raw("cycle status filter")]),
        Line::from(vec![key("  f        "), Span::raw("cycle priority filter")]),
        Line::from(vec![key("  r        "), Span::raw("reload tasks from the server")]),
        Line::from(vec![key("  L        "), Span::raw("log out")]),
        Line::from(vec![key("  ?        "), Span::raw("toggle this help")]),
        Line::from(vec![key("  q        "), Span::raw("quit")]),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::White)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn draw_error_popup(frame: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, frame.area());

    let popup_block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::Red));

    let error_text = Paragraph::new(error)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(popup_block);

    frame.render_widget(Clear, area);
    frame.render_widget(error_text, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
