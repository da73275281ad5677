//! 引物窗口构建 - 业务能力层
//!
//! 纯函数：一个捕获锚点 → 一对引物。
//! - 5F: `[anchor.end - L, anchor.end)`
//! - 3R: `[anchor.start, anchor.start + L)`

use crate::error::WindowError;
use crate::models::{CaptureAnchor, Primer, PrimerPair, WindowPolicy};

/// 由锚点构建引物对
///
/// # 参数
/// - `anchor`: 捕获锚点
/// - `total_length`: 引物窗口长度 L
/// - `template`: 规范化后的模板序列
/// - `occurrence`: 锚点在本序列中的序号（从 1 开始）
/// - `policy`: 窗口越界时失败还是截断
pub fn build_primer_pair(
    anchor: &CaptureAnchor,
    total_length: usize,
    template: &str,
    occurrence: usize,
    policy: WindowPolicy,
) -> Result<PrimerPair, WindowError> {
    let len = coord(template.len());
    let l = coord(total_length);

    let forward_name = format!("{}-5F-{}", anchor.name, occurrence);
    let reverse_name = format!("{}-3R-{}", anchor.name, occurrence);

    // 两个操作数都非负，减法不会溢出；加法饱和后必然越界
    let forward_end = coord(anchor.end);
    let reverse_start = coord(anchor.start);

    let primer_5f = window(
        forward_name,
        forward_end - l,
        forward_end,
        template,
        len,
        policy,
    )?;
    let primer_3r = window(
        reverse_name,
        reverse_start,
        reverse_start.saturating_add(l),
        template,
        len,
        policy,
    )?;

    Ok(PrimerPair {
        primer_5f,
        primer_3r,
    })
}

/// 坐标转为 `i64`，超出范围时饱和到 `i64::MAX`（一定落在模板之外）
fn coord(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn window(
    name: String,
    start: i64,
    end: i64,
    template: &str,
    len: i64,
    policy: WindowPolicy,
) -> Result<Primer, WindowError> {
    let out_of_range = |name: String| WindowError::OutOfRange {
        name,
        start,
        end,
        len: usize::try_from(len).unwrap_or_default(),
    };

    let (s, e) = match policy {
        WindowPolicy::Fail => {
            if start < 0 || end > len || start >= end {
                return Err(out_of_range(name));
            }
            (start, end)
        }
        WindowPolicy::Clip => {
            let (s, e) = (start.clamp(0, len), end.clamp(0, len));
            if s >= e {
                return Err(out_of_range(name));
            }
            (s, e)
        }
    };

    match Primer::from_template(name.clone(), template, s as usize, e as usize) {
        Some(primer) => Ok(primer),
        None => Err(out_of_range(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(len: usize) -> String {
        "ACGT".repeat(len / 4 + 1)[..len].to_string()
    }

    #[test]
    fn test_windows_flank_anchor() {
        let seq = template(1000);
        let anchor = CaptureAnchor::new("TP53", 500, 520);
        let pair = build_primer_pair(&anchor, 150, &seq, 1, WindowPolicy::Fail).unwrap();

        assert_eq!(pair.primer_5f.name, "TP53-5F-1");
        assert_eq!((pair.primer_5f.start, pair.primer_5f.end), (370, 520));
        assert_eq!(pair.primer_5f.seq, &seq[370..520]);

        assert_eq!(pair.primer_3r.name, "TP53-3R-1");
        assert_eq!((pair.primer_3r.start, pair.primer_3r.end), (500, 650));
        assert_eq!(pair.primer_3r.length, 150);
    }

    #[test]
    fn test_occurrence_in_names() {
        let seq = template(1000);
        let anchor = CaptureAnchor::new("EGFR", 300, 320);
        let pair = build_primer_pair(&anchor, 100, &seq, 2, WindowPolicy::Fail).unwrap();
        assert!(pair.primer_5f.name.ends_with("-5F-2"));
        assert!(pair.primer_3r.name.ends_with("-3R-2"));
    }

    #[test]
    fn test_fail_policy_rejects_out_of_range() {
        let seq = template(200);
        let anchor = CaptureAnchor::new("g", 10, 30);
        let err = build_primer_pair(&anchor, 150, &seq, 1, WindowPolicy::Fail).unwrap_err();
        assert_eq!(
            err,
            WindowError::OutOfRange {
                name: "g-5F-1".to_string(),
                start: -120,
                end: 30,
                len: 200,
            }
        );

        let anchor = CaptureAnchor::new("g", 150, 170);
        let err = build_primer_pair(&anchor, 150, &seq, 1, WindowPolicy::Fail).unwrap_err();
        assert!(matches!(err, WindowError::OutOfRange { end: 300, .. }));
    }

    #[test]
    fn test_clip_policy_clamps() {
        let seq = template(200);
        let anchor = CaptureAnchor::new("g", 100, 120);
        let pair = build_primer_pair(&anchor, 150, &seq, 1, WindowPolicy::Clip).unwrap();
        assert_eq!((pair.primer_5f.start, pair.primer_5f.end), (0, 120));
        assert_eq!((pair.primer_3r.start, pair.primer_3r.end), (100, 200));
        assert_eq!(pair.primer_3r.length, 100);
    }

    #[test]
    fn test_huge_coordinates_do_not_overflow() {
        let seq = template(200);
        let anchor = CaptureAnchor::new("g", usize::MAX - 10, usize::MAX);
        let err = build_primer_pair(&anchor, 150, &seq, 1, WindowPolicy::Fail).unwrap_err();
        assert!(matches!(err, WindowError::OutOfRange { len: 200, .. }));
        assert!(build_primer_pair(&anchor, 150, &seq, 1, WindowPolicy::Clip).is_err());

        let anchor = CaptureAnchor::new("g", 100, 120);
        let err = build_primer_pair(&anchor, usize::MAX, &seq, 1, WindowPolicy::Fail).unwrap_err();
        assert!(matches!(err, WindowError::OutOfRange { .. }));

        let pair = build_primer_pair(&anchor, usize::MAX, &seq, 1, WindowPolicy::Clip).unwrap();
        assert_eq!((pair.primer_5f.start, pair.primer_5f.end), (0, 120));
        assert_eq!((pair.primer_3r.start, pair.primer_3r.end), (100, 200));
    }

    #[test]
    fn test_clip_policy_fails_on_empty_window() {
        let seq = template(100);
        let anchor = CaptureAnchor::new("g", 100, 100);
        assert!(build_primer_pair(&anchor, 50, &seq, 1, WindowPolicy::Clip).is_err());
    }
}
