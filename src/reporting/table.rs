use console::{measure_text_width, pad_str, style, Alignment};

/// A titled grid of pre-formatted cells, rendered for the terminal or as HTML.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    notes: Vec<String>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells; extra cells are dropped.
    pub fn add_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    /// A line shown under the table, e.g. why a row is incomplete.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| measure_text_width(&row[i]))
                    .chain(std::iter::once(measure_text_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render_text(&self) -> String {
        let widths = self.column_widths();
        let rule = |left: &str, fill: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| fill.repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    let cell = pad_str(cell, *w, Alignment::Left, None).into_owned();
                    if bold {
                        style(cell).bold().to_string()
                    } else {
                        cell
                    }
                })
                .collect();
            format!("│ {} │", padded.join(" │ "))
        };

        let total_width = widths.iter().map(|w| w + 3).sum::<usize>() + 1;
        let mut out = String::new();
        out.push_str(&pad_str(&style(&self.title).italic().to_string(), total_width, Alignment::Center, None));
        out.push('\n');
        out.push_str(&rule("┌", "─", "┬", "┐"));
        out.push('\n');
        out.push_str(&line(&self.headers, true));
        out.push('\n');
        out.push_str(&rule("├", "─", "┼", "┤"));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row, false));
            out.push('\n');
        }
        out.push_str(&rule("└", "─", "┴", "┘"));
        out.push('\n');
        for note in &self.notes {
            out.push_str(&format!("{} {}\n", style("note:").yellow(), note));
        }
        out
    }

    pub fn render_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<table>\n");
        out.push_str(&format!("<caption>{}</caption>\n", escape_html(&self.title)));
        out.push_str("<thead><tr>");
        for header in &self.headers {
            out.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
        for note in &self.notes {
            out.push_str(&format!("<p class=\"note\">{}</p>\n", escape_html(note)));
        }
        out
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
