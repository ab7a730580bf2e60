use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::error::IoError;

/// One parsed row together with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Line number in the file.
    pub line: usize,
    /// The values of the row.
    pub values: Vec<f64>,
}

/// Read a whitespace separated table of floats.
///
/// Blank lines and lines starting with `#` are ignored.
///
/// # Arguments
///
/// * `path` - The path to the table.
/// * `skip_header` - Drop the first line of the file whatever it holds.
pub fn read_table(path: impl AsRef<Path>, skip_header: bool) -> Result<Vec<Row>, IoError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if i == 0 && skip_header {
            continue;
        }
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let values = content
            .split_whitespace()
            .map(|s| {
                s.parse::<f64>().map_err(|e| IoError::Parse {
                    path: path.to_path_buf(),
                    line: i + 1,
                    msg: format!("{s}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(Row {
            line: i + 1,
            values,
        });
    }

    Ok(rows)
}

/// Read a table whose rows all have exactly `N` values.
pub fn read_fixed_table<const N: usize>(
    path: impl AsRef<Path>,
    skip_header: bool,
) -> Result<Vec<[f64; N]>, IoError> {
    let path = path.as_ref();
    read_table(path, skip_header)?
        .into_iter()
        .map(|row| {
            let found = row.values.len();
            row.values
                .try_into()
                .map_err(|_| IoError::ColumnCount {
                    path: path.to_path_buf(),
                    line: row.line,
                    expected: N,
                    found,
                })
        })
        .collect()
}

/// Format a float like `%.18e`: 18 fractional digits and a signed,
/// at least two digit exponent.
///
/// Example:
///
/// ```
/// use helica_io::table::format_sci;
///
/// assert_eq!(format_sci(1.5), "1.500000000000000000e+00");
/// assert_eq!(format_sci(-0.125), "-1.250000000000000000e-01");
/// ```
pub fn format_sci(value: f64) -> String {
    let formatted = format!("{value:.18e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => formatted,
        },
        // inf / NaN
        None => formatted,
    }
}

/// Write rows of floats, space separated, in `%.18e` notation.
///
/// # Arguments
///
/// * `path` - The path to the output file.
/// * `header` - Optional header, written as a `# ` comment line.
/// * `rows` - The rows to write.
pub fn write_table<'a, I>(
    path: impl AsRef<Path>,
    header: Option<&str>,
    rows: I,
) -> Result<(), IoError>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if let Some(header) = header {
        writeln!(writer, "# {header}")?;
    }
    for row in rows {
        let line = row
            .iter()
            .map(|v| format_sci(*v))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_table_skips_comments_and_header() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("table.txt");
        std::fs::write(&path, "x y z\n1 2 3\n\n# note\n4.5 -6 7e-1\n")?;

        let rows = read_table(&path, true)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values, vec![1.0, 2.0, 3.0]);
        assert_eq!(rows[1].line, 5);
        assert_eq!(rows[1].values, vec![4.5, -6.0, 0.7]);

        // without skipping the header is a parse error on line 1
        assert!(matches!(
            read_table(&path, false),
            Err(IoError::Parse { line: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_fixed_table_column_count() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pos.txt");
        std::fs::write(&path, "# x y z\n1 2 3\n1 2\n")?;

        match read_fixed_table::<3>(&path, true) {
            Err(IoError::ColumnCount {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!((line, expected, found), (3, 3, 2));
            }
            other => panic!("expected a column count error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_write_table_format() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");
        let rows = [[1.0, -2.0], [0.0, 0.0625]];
        write_table(&path, Some("a b"), rows.iter().map(|r| r.as_slice()))?;

        let text = std::fs::read_to_string(&path)?;
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "# a b");
        assert_eq!(
            lines[1],
            "1.000000000000000000e+00 -2.000000000000000000e+00"
        );
        assert_eq!(
            lines[2],
            "0.000000000000000000e+00 6.250000000000000000e-02"
        );
        Ok(())
    }
}
