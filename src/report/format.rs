//! Formatted terminal output for every analysis result.
//!
//! Formatting stays here so the analysis code never builds strings beyond the
//! one-line interpretation it returns.

use crate::analysis::{
    CategoryMetrics, Comparison, Forecast, MarketSummary, Momentum, SeasonalPattern,
    TrendAnalysis, TrendReport,
};

/// Format a trend analysis (success or failure).
pub fn format_trend(analysis: &TrendAnalysis) -> String {
    let Some(r) = analysis.report() else {
        return format!(
            "Status: {}\n{}\n",
            analysis.status(),
            analysis.message().unwrap_or_default()
        );
    };

    let mut out = String::new();
    out.push_str(&format!("=== {} / {} ===\n", r.category, r.country));
    out.push_str(&format!("Window: {}\n", r.window.label()));
    out.push_str(&format!(
        "Bulletins: n={} | samples={} | {}..{}\n",
        r.data_points, r.movement_samples, r.first_bulletin, r.last_bulletin
    ));
    if let Some(d) = r.latest_priority_date {
        out.push_str(&format!("Latest cutoff: {d}\n"));
    }

    out.push_str("\nMovement (days per bulletin):\n");
    out.push_str(&format!(
        "- total={} avg={:.1} median={:.1} std={:.1} min={} max={}\n",
        r.total_advancement_days,
        r.average_advancement_days,
        r.median_advancement_days,
        r.std_deviation,
        r.min_advancement_days,
        r.max_advancement_days
    ));
    out.push_str(&format!(
        "- p25={:.1} p50={:.1} p75={:.1} p90={:.1}\n",
        r.percentiles.p25, r.percentiles.p50, r.percentiles.p75, r.percentiles.p90
    ));
    out.push_str(&format!(
        "- forward={} retrogressed={} unchanged={}\n",
        r.positive_months, r.negative_months, r.stagnant_months
    ));

    out.push_str("\nAssessment:\n");
    out.push_str(&format!(
        "- trend: {} (recent avg {:.1})\n",
        r.trend_direction.label(),
        r.recent_average_days
    ));
    out.push_str(&format!("- volatility: {}\n", r.volatility.label()));
    out.push_str(&format!("- consistency: {:.1}/100\n", r.consistency_score));
    out.push_str(&format!("- momentum: {}\n", fmt_momentum(&r.momentum)));
    out.push_str(&format!("- seasonality: {}\n", fmt_seasonal(&r.seasonal_pattern)));
    out.push_str(&format!(
        "- confidence: {} ({:.0})\n",
        r.prediction_confidence.level.label(),
        r.prediction_confidence.score
    ));

    out.push('\n');
    out.push_str(&r.interpretation);
    out.push('\n');
    out
}

/// Format a forecast as a per-period table.
pub fn format_forecast(forecast: &Forecast) -> String {
    let report = match forecast {
        Forecast::Success(report) => report,
        Forecast::PredictionFailed { reason } => {
            return format!("Status: prediction_failed\n{reason}\n");
        }
    };

    let mut out = String::new();
    out.push_str(&format!(
        "=== Forecast {} / {} ===\n",
        report.category, report.country
    ));
    out.push_str(&format!(
        "Historical avg: {:.1} days | momentum x{:.1} | margin ±{:.1} | confidence score {:.0}\n\n",
        report.historical_average,
        report.momentum_adjustment,
        report.margin_of_error,
        report.confidence_score
    ));

    out.push_str(
        format!(
            "{:>6} {:>10} {:>8} {:>8} {:<10} {:<12}\n",
            "period", "advance", "low", "high", "confidence", "cutoff"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<10} {:-<8} {:-<8} {:-<10} {:-<12}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');
    for p in &report.predictions {
        out.push_str(
            format!(
                "{:>6} {:>10} {:>8} {:>8} {:<10} {:<12}\n",
                p.period,
                p.predicted_advancement,
                p.range_low,
                p.range_high,
                p.confidence.label(),
                p.projected_cutoff.map(|d| d.to_string()).unwrap_or_default(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&report.disclaimer);
    out.push('\n');
    out
}

/// Format category rankings for one country.
pub fn format_comparison(cmp: &Comparison) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Category comparison: {} ({}) ===\n",
        cmp.country,
        cmp.window.label()
    ));
    out.push_str(&format!(
        "Analyzed: {} | excluded: {}\n\n",
        cmp.analyzed.len(),
        cmp.excluded.len()
    ));

    out.push_str("Fastest advancing:\n");
    out.push_str(&format_metrics_table(&cmp.fastest_advancing));
    out.push('\n');
    out.push_str("Most stable:\n");
    out.push_str(&format_metrics_table(&cmp.most_stable));
    out.push('\n');
    out.push_str("Most volatile:\n");
    out.push_str(&format_metrics_table(&cmp.most_volatile));

    for e in &cmp.excluded {
        out.push_str(&format!("  (excluded {}) {}: {}\n", e.category, e.status, e.message));
    }
    out
}

fn format_metrics_table(rows: &[CategoryMetrics]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<8} {:>10} {:>12} {:>8}\n", "category", "avg", "consistency", "std").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<8} {:-<10} {:-<12} {:-<8}\n", "", "", "", "").trim_end());
    out.push('\n');
    for m in rows {
        out.push_str(
            format!(
                "{:<8} {:>10.1} {:>12.1} {:>8.1}\n",
                m.category, m.average_advancement, m.consistency_score, m.std_deviation
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format the market summary.
pub fn format_summary(summary: &MarketSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Market summary ({}) ===\n", summary.window.label()));
    out.push_str(&format!(
        "Combinations: analyzed={} excluded={}\n\n",
        summary.combinations_analyzed, summary.excluded_combinations
    ));

    out.push_str(
        format!(
            "{:<8} {:<12} {:<24} {:>8} {:<10} {:<8}\n",
            "category", "country", "trend", "avg", "volatility", "data"
        )
        .trim_end(),
    );
    out.push('\n');
    for c in &summary.combinations {
        out.push_str(
            format!(
                "{:<8} {:<12} {:<24} {:>8.1} {:<10} {:<8}\n",
                c.category,
                truncate(c.country.label(), 12),
                c.trend_direction.label(),
                c.average_advancement,
                c.volatility.label(),
                format!("{:?}", c.data_quality).to_lowercase(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str("\nMost active categories:\n");
    for a in &summary.most_active_categories {
        out.push_str(&format!("- {} ({:.1} days/bulletin)\n", a.category, a.average_movement));
    }

    out.push_str("\nObservations:\n");
    for line in &summary.observations {
        out.push_str(&format!("- {line}\n"));
    }
    out
}

/// One-line headline for log output and compact listings.
pub fn headline(report: &TrendReport) -> String {
    format!(
        "{} {}: {} ({:+.1} d/bulletin, {} volatility)",
        report.category,
        report.country,
        report.trend_direction.label(),
        report.average_advancement_days,
        report.volatility.label()
    )
}

fn fmt_momentum(m: &Momentum) -> String {
    match m {
        Momentum::InsufficientData => "insufficient data".to_string(),
        Momentum::Measured {
            direction,
            recent_average,
            earlier_average,
            ..
        } => format!(
            "{} (recent {:.1} vs earlier {:.1})",
            direction.label(),
            recent_average,
            earlier_average
        ),
    }
}

fn fmt_seasonal(s: &SeasonalPattern) -> String {
    match s {
        SeasonalPattern::InsufficientData => "insufficient data".to_string(),
        SeasonalPattern::InsufficientMonthlyData { months_represented } => {
            format!("insufficient monthly data ({months_represented} months)")
        }
        SeasonalPattern::Detected {
            best_month,
            worst_month,
            spread,
            ..
        } => format!(
            "best {} ({:.1}), worst {} ({:.1}), spread {:.1}",
            best_month.name,
            best_month.average_advancement,
            worst_month.name,
            worst_month.average_advancement,
            spread
        ),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_series, predict};
    use crate::domain::{Category, Country, Observation, Window};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn analysis() -> TrendAnalysis {
        let obs = [
            Observation::dated(d(2024, 1), d(2012, 1)),
            Observation::dated(d(2024, 2), d(2012, 2)),
            Observation::current(d(2024, 3)),
            Observation::dated(d(2024, 4), d(2012, 3)),
        ];
        let window = Window::new(d(2023, 1), d(2024, 12)).unwrap();
        analyze_series(Category::Eb1, Country::China, window, &obs)
    }

    #[test]
    fn trend_report_mentions_key_figures() {
        let text = format_trend(&analysis());
        assert!(text.starts_with("=== EB-1 / CHINA ==="));
        assert!(text.contains("Latest cutoff: 2012-03-01"));
        assert!(text.contains("momentum: insufficient data"));
        assert!(text.contains("confidence: low (25)"));
    }

    #[test]
    fn forecast_table_has_one_row_per_period() {
        let forecast = predict(&analysis(), 3).unwrap();
        let text = format_forecast(&forecast);
        let rows = text.lines().filter(|l| l.trim_start().starts_with(char::is_numeric)).count();
        assert_eq!(rows, 3);
        assert!(text.contains("not guarantees"));
    }

    #[test]
    fn failure_renders_status() {
        let window = Window::new(d(2023, 1), d(2024, 12)).unwrap();
        let failed = analyze_series(Category::F3, Country::Mexico, window, &[]);
        assert!(format_trend(&failed).starts_with("Status: insufficient_data"));
    }

    #[test]
    fn headline_is_signed() {
        let a = analysis();
        assert_eq!(
            headline(a.report().unwrap()),
            "EB-1 CHINA: strongly advancing (+30.0 d/bulletin, low volatility)"
        );
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("PHILIPPINES", 6), "PHILI.");
        assert_eq!(truncate("INDIA", 6), "INDIA");
    }
}
