use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows under a header, columns padded to their widest cell.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", c, width = widths.get(i).copied().unwrap_or(0)))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers.iter().map(|h| h.to_string()).collect());
    line(widths.iter().map(|&w| "-".repeat(w)).collect());
    for row in rows {
        line(row);
    }
}

/// Ten-cell bar for a 0-100 percentage: `[#####-----]  50%`.
pub fn progress_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize + 5) / 10;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(10 - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_rounds_to_nearest_cell() {
        assert_eq!(progress_bar(0), "[----------]   0%");
        assert_eq!(progress_bar(50), "[#####-----]  50%");
        assert_eq!(progress_bar(67), "[#######---]  67%");
        assert_eq!(progress_bar(100), "[##########] 100%");
    }
}
