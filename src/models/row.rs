use crate::models::column::Column;

/// 输入表格中的一行
///
/// 按表头顺序保存 `(列名, 值)`，读取后不可变。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRow {
    fields: Vec<(String, String)>,
}

impl InputRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// 由基因名称和序列直接构造（测试和程序化调用使用）
    pub fn from_pair(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            fields: vec![
                (Column::GeneName.label().to_string(), name.into()),
                (Column::DnaSequence.label().to_string(), sequence.into()),
            ],
        }
    }

    /// 按语义列取值（第一个匹配的列）
    pub fn column(&self, column: Column) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| Column::from_header(k) == Some(column))
            .map(|(_, v)| v.as_str())
    }

    pub fn gene_name(&self) -> &str {
        self.column(Column::GeneName).map(str::trim).unwrap_or_default()
    }

    pub fn raw_sequence(&self) -> &str {
        self.column(Column::DnaSequence).unwrap_or_default()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}
