//! 网格的文本渲染

use std::fmt::Write;

use level::{GridSnapshot, TileKind};

/// 将快照渲染为字符网格，每行前带行号，首行为列号（个位）
pub fn render_grid(snapshot: &GridSnapshot) -> String {
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..snapshot.cols {
        let _ = write!(out, " {}", col % 10);
    }
    out.push('\n');

    for row in 0..snapshot.rows {
        let _ = write!(out, "{:>3}", row);
        for col in 0..snapshot.cols {
            let glyph = snapshot.get(row, col).unwrap_or_default().glyph();
            out.push(' ');
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// 图例：字符、内部名称、显示名称
pub fn render_legend() -> String {
    TileKind::ALL
        .iter()
        .map(|kind| format!("{}  {:<15} {}", kind.glyph(), kind.as_str(), kind.label()))
        .collect::<Vec<_>>()
        .join("\n")
}
