use crate::error::TableError;
use crate::models::column::Column;
use crate::models::row::InputRow;
use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use tokio::fs;

/// 工作簿中优先读取的工作表
const PREFERRED_SHEET: &str = "Sheet1";

/// 输入表格格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// 分隔符文本（逗号或制表符）
    Delimited(u8),
    /// Excel / ODS 工作簿
    Workbook,
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// 根据扩展名选择分隔符：`.tsv` / `.txt` 为制表符，其余为逗号
pub fn delimiter_for(path: &Path) -> u8 {
    match extension_of(path).as_deref() {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    }
}

/// 根据扩展名判断表格格式
pub fn table_format(path: &Path) -> TableFormat {
    match extension_of(path).as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            TableFormat::Workbook
        }
        _ => TableFormat::Delimited(delimiter_for(path)),
    }
}

/// 读取输入表格，第一行为表头
///
/// 表头必须包含基因名称和 DNA 序列两列（接受中英文别名）。
/// 完全空白的行会被跳过；比表头短的行只保留已有的单元格。
/// 工作簿读取 `Sheet1`，不存在时读取第一个工作表。
pub async fn load_table(path: &Path) -> Result<Vec<InputRow>, TableError> {
    let path_str = path.display().to_string();

    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(TableError::NotFound { path: path_str });
    }

    let grid = match table_format(path) {
        TableFormat::Workbook => {
            let owned = path.to_path_buf();
            let task_path = path_str.clone();
            tokio::task::spawn_blocking(move || read_workbook(&owned, &task_path))
                .await
                .map_err(|e| TableError::WorkbookFailed {
                    path: path_str.clone(),
                    reason: e.to_string(),
                })??
        }
        TableFormat::Delimited(delimiter) => {
            let bytes = fs::read(path).await.map_err(|e| TableError::ReadFailed {
                path: path_str.clone(),
                source: csv::Error::from(e),
            })?;
            read_delimited(&bytes, delimiter, &path_str)?
        }
    };

    rows_from_grid(grid, &path_str)
}

fn read_delimited(
    bytes: &[u8],
    delimiter: u8,
    path_str: &str,
) -> Result<Vec<Vec<String>>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| TableError::ReadFailed {
            path: path_str.to_string(),
            source,
        })?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

fn read_workbook(path: &Path, path_str: &str) -> Result<Vec<Vec<String>>, TableError> {
    let workbook_failed = |reason: String| TableError::WorkbookFailed {
        path: path_str.to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_failed(e.to_string()))?;
    let names = workbook.sheet_names();
    let sheet = names
        .iter()
        .find(|name| name.as_str() == PREFERRED_SHEET)
        .or_else(|| names.first())
        .cloned()
        .ok_or_else(|| TableError::Empty {
            path: path_str.to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_failed(e.to_string()))?;
    tracing::debug!("工作簿 {} 读取工作表 {}", path_str, sheet);

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

/// 第一行作为表头，其余行按表头配对
fn rows_from_grid(grid: Vec<Vec<String>>, path_str: &str) -> Result<Vec<InputRow>, TableError> {
    let mut lines = grid.into_iter();
    let headers: Vec<String> = lines
        .next()
        .unwrap_or_default()
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::Empty {
            path: path_str.to_string(),
        });
    }

    for column in [Column::GeneName, Column::DnaSequence] {
        if !headers.iter().any(|h| Column::from_header(h) == Some(column)) {
            return Err(TableError::MissingColumn {
                path: path_str.to_string(),
                column: column.label(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in lines {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let fields = headers.iter().cloned().zip(record).collect();
        rows.push(InputRow::new(fields));
    }

    tracing::debug!("表格 {} 解析完成，共 {} 行", path_str, rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str, delimiter: u8) -> Result<Vec<InputRow>, TableError> {
        rows_from_grid(read_delimited(data.as_bytes(), delimiter, "mem")?, "mem")
    }

    #[test]
    fn test_parse_localized_headers() {
        let data = "基因名称,DNA序列\nTP53,ACGTACGT\nEGFR,GGCCAATT\n";
        let rows = parse(data, b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].gene_name(), "TP53");
        assert_eq!(rows[1].raw_sequence(), "GGCCAATT");
    }

    #[test]
    fn test_parse_tab_and_short_rows() {
        let data = "gene name\tDNA sequence\tnote\nA\tACGT\nB\t\t\n\t\t\n";
        let rows = parse(data, b'\t').unwrap();
        // 第三行全空被跳过
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields().len(), 2);
        assert_eq!(rows[1].raw_sequence(), "");
    }

    #[test]
    fn test_missing_column() {
        let err = parse("gene name,remark\nA,x\n", b',').unwrap_err();
        assert!(matches!(
            err,
            TableError::MissingColumn {
                column: "DNA sequence",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_table() {
        let err = parse("", b',').unwrap_err();
        assert!(matches!(err, TableError::Empty { .. }));
    }

    #[test]
    fn test_sheet_grid_with_leading_blank_rows_skipped() {
        // 工作表单元格转成字符串后的形态：数字列、空单元格
        let grid = vec![
            vec!["序号".to_string(), "基因名称".to_string(), "DNA序列".to_string()],
            vec![String::new(), String::new(), String::new()],
            vec!["1".to_string(), "BRCA1".to_string(), "acgt".to_string()],
        ];
        let rows = rows_from_grid(grid, "Sheet1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gene_name(), "BRCA1");
        assert_eq!(rows[0].raw_sequence(), "acgt");
    }

    #[test]
    fn test_table_format() {
        assert_eq!(table_format(Path::new("in.XLSX")), TableFormat::Workbook);
        assert_eq!(table_format(Path::new("in.ods")), TableFormat::Workbook);
        assert_eq!(table_format(Path::new("in.csv")), TableFormat::Delimited(b','));
        assert_eq!(table_format(Path::new("in.tsv")), TableFormat::Delimited(b'\t'));
    }

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for(Path::new("a.TSV")), b'\t');
        assert_eq!(delimiter_for(Path::new("a.csv")), b',');
        assert_eq!(delimiter_for(Path::new("noext")), b',');
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_table(Path::new("/nonexistent/dir/input.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_corrupt_workbook() {
        let path = std::env::temp_dir().join(format!("crp_corrupt_{}.xlsx", std::process::id()));
        fs::write(&path, b"not a zip archive").await.unwrap();

        let err = load_table(&path).await.unwrap_err();
        assert!(matches!(err, TableError::WorkbookFailed { .. }));

        let _ = fs::remove_file(&path).await;
    }
}
