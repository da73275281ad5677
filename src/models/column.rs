use phf::phf_map;

/// 输入表格中的语义列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// 基因名称
    GeneName,
    /// DNA 序列
    DnaSequence,
}

/// 表头别名（已转为小写），支持中英文表头
static HEADER_ALIASES: phf::Map<&'static str, Column> = phf_map! {
    "gene name" => Column::GeneName,
    "gene" => Column::GeneName,
    "name" => Column::GeneName,
    "基因名称" => Column::GeneName,
    "基因名" => Column::GeneName,
    "dna sequence" => Column::DnaSequence,
    "sequence" => Column::DnaSequence,
    "seq" => Column::DnaSequence,
    "dna序列" => Column::DnaSequence,
    "序列" => Column::DnaSequence,
};

impl Column {
    /// 标准表头名称
    pub fn label(self) -> &'static str {
        match self {
            Column::GeneName => "gene name",
            Column::DnaSequence => "DNA sequence",
        }
    }

    /// 从表头解析语义列（忽略大小写和首尾空白）
    pub fn from_header(header: &str) -> Option<Self> {
        let key = header.trim().to_lowercase();
        HEADER_ALIASES.get(key.as_str()).copied()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_headers() {
        assert_eq!(Column::from_header("基因名称"), Some(Column::GeneName));
        assert_eq!(Column::from_header("DNA序列"), Some(Column::DnaSequence));
        assert_eq!(Column::from_header("  Gene Name "), Some(Column::GeneName));
        assert_eq!(Column::from_header("DNA Sequence"), Some(Column::DnaSequence));
        assert_eq!(Column::from_header("remark"), None);
    }
}
