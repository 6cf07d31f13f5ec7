//! Shared helpers for benchmarks

/// A markdown note of roughly `sections` screenfuls with literals of every
/// family, inline code, fenced blocks and a frontmatter header
#[allow(dead_code)]
pub fn make_note(sections: usize) -> String {
    let mut note = String::from("---\ntitle: Palette\naccent: \"#3366ff\"\n---\n\n");
    for i in 0..sections {
        let shade = (i * 7 % 256) as u8;
        note.push_str(&format!(
            "## Section {i}\n\n\
             Primary #{shade:02x}3366 with accent `rgb({shade}, 120, 200)` and a \
             translucent hsla({hue}, 60%, 45%, 0.5) overlay.\n\n\
             ```css\n.card-{i} {{ color: #fff; background: rgba({shade}, 0, 0, .25); }}\n```\n\n\
             Plain prose without any colors at all, just filler text to scan past.\n\n",
            hue = i * 13 % 360,
        ));
    }
    note
}
