//! Potato Land rendering: header, tab bar, tab content and the log panel.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::achievements;
use super::actions::*;
use super::catalog::UpgradeDefinition;
use super::logic::{auto_click_interval_ms, pending_prestige, PRESTIGE_THRESHOLD};
use super::{PotatoGame, Tab};

const POTATO_ART: &[&str] = &["  ╭──────╮ ", " ╱ ·  ·   ╲", " ╲   ·  · ╱", "  ╰──────╯ "];

pub fn render(game: &PotatoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);

    let (main_area, log_area) = if narrow {
        let v = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(7)])
            .split(area);
        (v[0], v[1])
    } else {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (h[0], h[1])
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // tab bar
            Constraint::Min(5),    // content
        ])
        .split(main_area);

    render_header(game, f, chunks[0]);
    render_tab_bar(game, f, chunks[1], click_state);
    match game.tab {
        Tab::Farm => render_farm(game, f, chunks[2], click_state),
        Tab::Shop => render_shop(game, f, chunks[2], click_state),
        Tab::Goals => render_goals(game, f, chunks[2]),
        Tab::Stats => render_stats(game, f, chunks[2]),
        Tab::Settings => render_settings(game, f, chunks[2], click_state),
    }
    render_log(game, f, log_area);
}

fn render_header(game: &PotatoGame, f: &mut Frame, area: Rect) {
    let s = &game.farm.state;
    let fmt = |n: f64| game.settings.format(n);
    let line = Line::from(vec![
        Span::styled("🥔 Potato Land ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(fmt(s.potatoes.floor()), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  +{}/s", fmt(s.effective_production())), Style::default().fg(Color::Green)),
        Span::styled(format!("  Lv.{}", s.level), Style::default().fg(Color::Cyan)),
    ]);
    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
}

fn render_tab_bar(game: &PotatoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let tab_style = |tab: Tab, color: Color| -> Style {
        if game.tab == tab {
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    };

    let unlocked = game.farm.state.achievements.len();
    let goals_label = format!("実績({}/{})", unlocked, game.farm.catalog.achievements.len());

    let mut cs = click_state.borrow_mut();
    TabBar::new("│")
        .tab("農場", tab_style(Tab::Farm, Color::Green), TAB_FARM)
        .tab("ショップ", tab_style(Tab::Shop, Color::Magenta), TAB_SHOP)
        .tab(goals_label, tab_style(Tab::Goals, Color::Yellow), TAB_GOALS)
        .tab("統計", tab_style(Tab::Stats, Color::Cyan), TAB_STATS)
        .tab("設定", tab_style(Tab::Settings, Color::Blue), TAB_SETTINGS)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(f, area, &mut cs);
}

/// `[████░░░░]` style bar.
fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_farm(game: &PotatoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let s = &game.farm.state;
    let fmt = |n: f64| game.settings.format(n);
    let mut cl = ClickableList::new();

    let art_style = if game.dig_flash > 0 {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Yellow)
    };
    for row in POTATO_ART {
        cl.push_clickable(Line::from(Span::styled(*row, art_style)), DIG);
    }
    let dig_line = Line::from(vec![
        Span::styled(" [C] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("掘る (+{}/クリック)", fmt(s.base_click_gain())),
            Style::default().fg(Color::White),
        ),
    ]);
    cl.push_clickable(dig_line, DIG);
    cl.push(Line::from(""));

    let exp_ratio = s.experience / s.required_experience();
    cl.push(Line::from(vec![
        Span::styled(format!(" Lv.{} ", s.level), Style::default().fg(Color::Cyan)),
        Span::styled(progress_bar(exp_ratio, 16), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(" {}/{}", fmt(s.experience.floor()), fmt(s.required_experience())),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    cl.push(Line::from(Span::styled(
        format!(
            " クリティカル {:.0}% ×{:.1}",
            s.critical_chance * 100.0,
            s.critical_multiplier
        ),
        Style::default().fg(Color::Red),
    )));
    if let Some(ms) = auto_click_interval_ms(s.auto_clicker_level) {
        cl.push(Line::from(Span::styled(
            format!(" 自動クリック Lv.{} ({}ms毎)", s.auto_clicker_level, ms),
            Style::default().fg(Color::Magenta),
        )));
    }
    cl.push(Line::from(""));

    let pending = pending_prestige(s);
    if pending > 0 {
        let line = Line::from(vec![
            Span::styled(" [P] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("転生する (+{} プレステージ)", pending),
                Style::default().fg(Color::Yellow),
            ),
        ]);
        cl.push_clickable(line, PRESTIGE);
    } else {
        let ratio = s.total_potatoes / PRESTIGE_THRESHOLD;
        cl.push(Line::from(Span::styled(
            format!(" 転生まで {} {:.0}%", progress_bar(ratio, 12), ratio * 100.0),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let save_line = Line::from(vec![
        Span::styled(" [S] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled("セーブ", Style::default().fg(Color::White)),
    ]);
    cl.push_clickable(save_line, SAVE);

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" 農場 "),
    );
    f.render_widget(widget, area);
}

fn upgrade_effect_label(u: &UpgradeDefinition) -> String {
    use super::catalog::UpgradeKind::*;
    match u.kind {
        Click => format!("+{} クリック", u.effect),
        Auto => format!("+{}/s", u.effect),
        Multiplier => format!("+{} 倍率", u.effect),
        Critical => format!("+{:.0}% クリティカル", u.effect * 100.0),
        Farm => format!("+{} 農地", u.effect),
        Special => u.category.to_string(),
    }
}

/// Shop panels at least this wide also show each upgrade's description.
const WIDE_SHOP_WIDTH: u16 = 100;

fn render_shop(game: &PotatoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let potatoes = game.farm.state.potatoes;
    let mut cl = ClickableList::new();

    for (idx, u) in game.farm.catalog.upgrades.iter().enumerate() {
        let key = shop_key(idx).unwrap_or(' ');
        let maxed = u.is_maxed();
        let affordable = !maxed && potatoes >= u.cost;
        let name_style = if maxed {
            Style::default().fg(Color::DarkGray)
        } else if affordable {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cost_text = if maxed {
            "MAX".to_string()
        } else {
            game.settings.format(u.cost)
        };
        let owned_text = match u.max_owned {
            Some(max) => format!("{}/{}", u.owned, max),
            None => u.owned.to_string(),
        };
        let mut line = Line::from(vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(if affordable { Color::Yellow } else { Color::DarkGray }),
            ),
            Span::styled(format!("{:<18}", u.name), name_style),
            Span::styled(
                format!("{:>10} ", cost_text),
                Style::default().fg(if affordable { Color::Green } else { Color::Red }),
            ),
            Span::styled(format!("x{:<5} ", owned_text), Style::default().fg(Color::Cyan)),
            Span::styled(upgrade_effect_label(u), Style::default().fg(Color::DarkGray)),
        ]);
        if area.width >= WIDE_SHOP_WIDTH {
            line.spans.push(Span::styled(
                format!("  {}", u.description),
                Style::default().fg(Color::DarkGray),
            ));
        }
        cl.push_clickable(line, BUY_UPGRADE_BASE + idx as u16);
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" ショップ "),
    );
    f.render_widget(widget, area);
}

fn render_goals(game: &PotatoGame, f: &mut Frame, area: Rect) {
    let s = &game.farm.state;
    let catalog = &game.farm.catalog;
    let lines: Vec<Line> = catalog
        .achievements
        .iter()
        .map(|a| {
            if a.unlocked {
                Line::from(vec![
                    Span::styled(format!(" {} ", a.icon), Style::default()),
                    Span::styled(a.name, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", a.description), Style::default().fg(Color::DarkGray)),
                ])
            } else {
                let p = achievements::progress(s, catalog, a);
                let reward = a.reward.map(|r| r.describe()).unwrap_or_default();
                Line::from(vec![
                    Span::styled(" ・ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(a.name, Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("  {} {:>3.0}%", progress_bar(p, 8), p * 100.0),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(format!("  {}", reward), Style::default().fg(Color::DarkGray)),
                ])
            }
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" 実績 "),
    );
    f.render_widget(widget, area);
}

fn render_stats(game: &PotatoGame, f: &mut Frame, area: Rect) {
    let s = &game.farm.state;
    let fmt = |n: f64| game.settings.format(n);
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let row = |name: &'static str, v: String| {
        Line::from(vec![
            Span::styled(format!(" {:<14}", name), label),
            Span::styled(v, value),
        ])
    };
    let playtime = format!("{}時間{}分", s.playtime / 3600, (s.playtime % 3600) / 60);

    let lines = vec![
        row("累計収穫", fmt(s.total_potatoes.floor())),
        row("クリック数", s.total_clicks.to_string()),
        row("クリック力", fmt(s.click_power)),
        row("倍率", format!("×{:.2}", s.multiplier)),
        row("プレステージ", format!("{} (×{:.1})", s.prestige, s.prestige_bonus)),
        row("研究ポイント", s.research_points.to_string()),
        row("農地", fmt(s.farm_size)),
        row("天候/季節", format!("×{:.1} / ×{:.1}", s.weather_bonus, s.season_bonus)),
        row(
            "レアポテト",
            format!(
                "金 {}  ダイヤ {}  虹 {}",
                s.golden_potatoes, s.diamond_potatoes, s.rainbow_potatoes
            ),
        ),
        row("アップグレード", game.farm.catalog.distinct_owned().to_string()),
        row("プレイ時間", playtime),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 統計 "),
    );
    f.render_widget(widget, area);
}

fn toggle_line(key: char, name: &str, on: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" [{}] ", key), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:<12}", name), Style::default().fg(Color::White)),
        Span::styled(
            if on { "ON" } else { "OFF" },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        ),
    ])
}

fn action_line(key: char, text: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" [{}] ", key), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(text.to_string(), Style::default().fg(Color::White)),
    ])
}

fn render_settings(game: &PotatoGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let st = &game.settings;
    let mut cl = ClickableList::new();
    cl.push_clickable(toggle_line('N', "通知", st.notifications), TOGGLE_NOTIFICATIONS);
    cl.push_clickable(toggle_line('M', "数値の短縮", st.compact_numbers), TOGGLE_COMPACT);
    cl.push_clickable(toggle_line('O', "オートセーブ", st.autosave), TOGGLE_AUTOSAVE);
    cl.push(Line::from(""));
    cl.push_clickable(action_line('X', "セーブを書き出す", Color::Cyan), EXPORT_SAVE);
    cl.push_clickable(action_line('I', "セーブを読み込む", Color::Cyan), IMPORT_SAVE);
    cl.push_clickable(action_line('D', "セーブを削除", Color::Red), DELETE_SAVE);
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        " 設定は削除後も保持されます",
        Style::default().fg(Color::DarkGray),
    )));

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" 設定 "),
    );
    f.render_widget(widget, area);
}

fn render_log(game: &PotatoGame, f: &mut Frame, area: Rect) {
    let count = game.log.len();
    let lines: Vec<Line> = game
        .log
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_recent = i + 3 >= count;
            let style = match (entry.is_important, is_recent) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" ログ ");
    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Keep the newest line at the bottom
    let total = paragraph.line_count(inner.width) as u16;
    let scroll = total.saturating_sub(inner.height);
    f.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}
