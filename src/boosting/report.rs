//! Parsing of the engine's textual evaluation report.
//!
//! The engine reports one round as `[iter]\tname:value\tname:value...`.
//! This is the only place in the crate that knows that format.

use crate::core::error::{GbmError, Result};
use crate::core::types::NamedMetrics;

/// Parse one evaluation report line into named metric values.
///
/// A leading `[..]` iteration tag is skipped. Each remaining token is split
/// at its last `:`, so metric names may themselves contain colons. A report
/// with no metric tokens yields an empty result.
pub fn parse_eval_report(report: &str) -> Result<NamedMetrics> {
    let mut tokens = report.split_whitespace().peekable();
    if let Some(first) = tokens.peek() {
        if first.starts_with('[') && first.ends_with(']') {
            tokens.next();
        }
    }

    tokens
        .map(|token| {
            let (name, value) = token.rsplit_once(':').ok_or_else(|| {
                GbmError::report_parse(format!("token '{}' has no ':'", token), report)
            })?;
            if name.is_empty() {
                return Err(GbmError::report_parse(
                    format!("token '{}' has an empty metric name", token),
                    report,
                ));
            }
            let value = value.parse::<f64>().map_err(|_| {
                GbmError::report_parse(format!("'{}' is not a number", value), report)
            })?;
            Ok((name.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typical_report() {
        let metrics = parse_eval_report("[3]\ttrain-rmse:0.512\ttest-rmse:0.634").unwrap();
        assert_eq!(
            metrics,
            vec![
                ("train-rmse".to_string(), 0.512),
                ("test-rmse".to_string(), 0.634)
            ]
        );
    }

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        let metrics =
            parse_eval_report("[0]\ttrain-auc:0.9\ttrain-logloss:0.3\ttest-auc:0.8").unwrap();
        let names: Vec<&str> = metrics.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["train-auc", "train-logloss", "test-auc"]);
    }

    #[test]
    fn test_parse_metric_with_parameter() {
        let metrics = parse_eval_report("[10]\ttest-ndcg@5:0.71\ttest-error@0.7:0.2").unwrap();
        assert_eq!(metrics[0].0, "test-ndcg@5");
        assert_eq!(metrics[1], ("test-error@0.7".to_string(), 0.2));
    }

    #[test]
    fn test_parse_empty_report() {
        assert!(parse_eval_report("[0]").unwrap().is_empty());
        assert!(parse_eval_report("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_without_iteration_tag() {
        let metrics = parse_eval_report("train-rmse:1.5").unwrap();
        assert_eq!(metrics, vec![("train-rmse".to_string(), 1.5)]);
    }

    #[test]
    fn test_parse_special_values() {
        let metrics = parse_eval_report("[1]\ttrain-mape:inf\ttest-mape:nan").unwrap();
        assert!(metrics[0].1.is_infinite());
        assert!(metrics[1].1.is_nan());
    }

    #[test]
    fn test_parse_malformed_tokens() {
        let err = parse_eval_report("[1]\ttrain-rmse").unwrap_err();
        assert!(matches!(err, GbmError::ReportParse { .. }));

        let err = parse_eval_report("[1]\ttrain-rmse:abc").unwrap_err();
        assert!(matches!(err, GbmError::ReportParse { .. }));

        let err = parse_eval_report("[1]\t:0.5").unwrap_err();
        assert!(matches!(err, GbmError::ReportParse { .. }));
    }
}
