//! HTML pages
//!
//! Rendered with `fmt::Write` into a `String`; every interpolated value
//! goes through [`escape_html`].

use crate::ipinfo::IpInfo;
use arena_game::{GameRecord, PlayerAggregate, StatsSnapshot};
use std::fmt::{self, Write};

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Win rate with one decimal, e.g. "66.7"
pub fn format_win_rate(player: &PlayerAggregate) -> String {
    format!("{:.1}", player.win_rate())
}

/// Arena home page
pub fn render_home(stats: &StatsSnapshot) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        "<title>Rock Paper Scissors Arena</title>\n",
        "<link rel=\"stylesheet\" href=\"/static/css/arena.css\">\n",
        "</head>\n<body>\n<div class=\"container\">\n",
        "<h1 class=\"title\">Rock Paper Scissors Arena</h1>\n",
    ));

    html.push_str("<div class=\"stats-grid\">\n");
    stat_card(&mut html, "Total Games", stats.total_games)?;
    stat_card(&mut html, "Players", stats.total_players as u64)?;
    stat_card(&mut html, "Rock", stats.move_stats.rock)?;
    stat_card(&mut html, "Paper", stats.move_stats.paper)?;
    stat_card(&mut html, "Scissors", stats.move_stats.scissors)?;
    stat_card(&mut html, "Player Wins", stats.win_stats.win)?;
    html.push_str("</div>\n");

    html.push_str(concat!(
        "<div class=\"play-area\">\n",
        "<input type=\"text\" id=\"playerName\" placeholder=\"Your name\" maxlength=\"40\">\n",
        "<div class=\"moves\">\n",
        "<button class=\"move-btn\" data-move=\"rock\">Rock</button>\n",
        "<button class=\"move-btn\" data-move=\"paper\">Paper</button>\n",
        "<button class=\"move-btn\" data-move=\"scissors\">Scissors</button>\n",
        "</div>\n",
        "<div id=\"gameResult\" class=\"game-result-panel hidden\"></div>\n",
        "</div>\n",
    ));

    html.push_str("<div class=\"columns\">\n<div class=\"leaderboard\">\n");
    html.push_str("<h2 class=\"section-title\">Leaderboard</h2>\n");
    for (rank, player) in stats.leaderboard.iter().enumerate() {
        leaderboard_row(&mut html, rank + 1, player)?;
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"recent-games\">\n");
    html.push_str("<h2 class=\"section-title\">Recent Games</h2>\n");
    for game in &stats.recent_games {
        game_row(&mut html, game)?;
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("</div>\n<script src=\"/static/js/game.js\"></script>\n</body>\n</html>\n");
    Ok(html)
}

fn stat_card(html: &mut String, label: &str, value: u64) -> fmt::Result {
    writeln!(
        html,
        "<div class=\"stat-card\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">{}</div></div>",
        value,
        escape_html(label)
    )
}

fn leaderboard_row(html: &mut String, rank: usize, player: &PlayerAggregate) -> fmt::Result {
    writeln!(
        html,
        concat!(
            "<div class=\"leaderboard-item\">",
            "<div class=\"rank\">#{}</div>",
            "<div class=\"player-stats\">",
            "<div class=\"player-name\">{}</div>",
            "<div class=\"player-details\">{} games &bull; {}W {}L {}D</div>",
            "</div>",
            "<div class=\"win-rate\">{}%</div>",
            "</div>"
        ),
        rank,
        escape_html(&player.name),
        player.total,
        player.wins,
        player.losses,
        player.draws,
        format_win_rate(player)
    )
}

fn game_row(html: &mut String, game: &GameRecord) -> fmt::Result {
    writeln!(
        html,
        concat!(
            "<div class=\"game-item\">",
            "<div class=\"game-header\">",
            "<div class=\"game-moves\"><strong>{}</strong>: {} vs {}</div>",
            "<span class=\"game-result {}\">{}</span>",
            "</div>",
            "<div class=\"game-meta\">{} &bull; {}</div>",
            "</div>"
        ),
        escape_html(&game.player_name),
        game.player_move,
        game.computer_move,
        game.result,
        game.result.label(),
        game.timestamp.format("%H:%M:%S"),
        escape_html(&game.player_ip)
    )
}

/// IP reflector page
pub fn render_ip_info(info: &IpInfo) -> Result<String, fmt::Error> {
    let pretty = serde_json::to_string_pretty(info).map_err(|_| fmt::Error)?;
    let mut html = String::with_capacity(4 * 1024);

    html.push_str(concat!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>IP Information Service</title>\n<style>\n",
        "body { font-family: Arial, sans-serif; margin: 40px; }\n",
        ".container { max-width: 800px; margin: 0 auto; }\n",
        ".ip-info { background: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0; }\n",
        ".header { color: #333; border-bottom: 2px solid #007acc; padding-bottom: 10px; }\n",
        ".info-row { margin: 10px 0; }\n",
        ".label { font-weight: bold; color: #555; }\n",
        ".value { font-family: monospace; background: #fff; padding: 5px; border-radius: 3px; }\n",
        ".json-output { background: #2d3748; color: #e2e8f0; padding: 15px; border-radius: 5px; overflow-x: auto; }\n",
        "</style>\n</head>\n<body>\n<div class=\"container\">\n",
        "<h1 class=\"header\">IP Information Service</h1>\n",
        "<div class=\"ip-info\">\n",
    ));

    info_row(&mut html, "Your IP Address", &info.client_ip)?;
    info_row(&mut html, "Server IP", &info.server_ip)?;
    info_row(&mut html, "Hostname", &info.hostname)?;
    info_row(&mut html, "User Agent", &info.user_agent)?;
    html.push_str("</div>\n<h3>Request Headers:</h3>\n<div class=\"ip-info\">\n");

    for (name, value) in &info.headers {
        info_row(&mut html, name, value)?;
    }

    html.push_str("</div>\n<h3>JSON Output:</h3>\n<div class=\"json-output\">\n");
    writeln!(html, "<pre>{}</pre>", escape_html(&pretty))?;
    html.push_str("</div>\n<p><a href=\"/api\">Get JSON API response</a></p>\n</div>\n</body>\n</html>\n");

    Ok(html)
}

fn info_row(html: &mut String, label: &str, value: &str) -> fmt::Result {
    writeln!(
        html,
        "<div class=\"info-row\"><span class=\"label\">{}:</span> <span class=\"value\">{}</span></div>",
        escape_html(label),
        escape_html(value)
    )
}
