//! 成绩计算：百分比、加权平均、等级、排名和考试统计

use std::collections::BTreeMap;

use crate::config::{AppConfig, GradeBandConfig, GradingConfig};
use crate::models::exams::responses::{ExamStatsResponse, GradeCount};
use crate::models::report_cards::entities::{ScoreRow, SubjectReport};

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 得分占满分的百分比，满分不为正时记为 0
pub fn percentage(score: f64, max_score: f64) -> f64 {
    if max_score <= 0.0 {
        return 0.0;
    }
    round2(score / max_score * 100.0)
}

/// 按权重加权的平均百分比，输入为 (百分比, 权重)
pub fn weighted_percentage<I>(items: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, total_weight) = items
        .into_iter()
        .filter(|(_, weight)| *weight > 0.0)
        .fold((0.0, 0.0), |(sum, total), (pct, weight)| {
            (sum + pct * weight, total + weight)
        });

    if total_weight <= 0.0 {
        None
    } else {
        Some(round2(sum / total_weight))
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(round2(values.iter().sum::<f64>() / values.len() as f64))
    }
}

/// 竞争排名：分数越高名次越前，同分同名次，后续名次跳过（1,2,2,4）
///
/// 返回值与输入顺序一一对应。
pub fn rank_with_ties(values: &[f64]) -> Vec<i64> {
    values
        .iter()
        .map(|value| 1 + values.iter().filter(|other| *other > value).count() as i64)
        .collect()
}

/// 等级分段表
#[derive(Debug, Clone)]
pub struct GradeScale {
    pass_percent: f64,
    bands: Vec<GradeBandConfig>,
}

impl GradeScale {
    pub fn from_config(config: &GradingConfig) -> Self {
        let mut bands = if config.scale.is_empty() {
            GradingConfig::default().scale
        } else {
            config.scale.clone()
        };
        bands.sort_by(|a, b| b.min_percent.total_cmp(&a.min_percent));

        Self {
            pass_percent: config.pass_percent,
            bands,
        }
    }

    /// 使用全局配置中的分段表
    pub fn current() -> Self {
        Self::from_config(&AppConfig::get().grading)
    }

    /// 第一个下限不高于该百分比的分段；低于所有分段时取最低一档
    pub fn grade_for(&self, pct: f64) -> &GradeBandConfig {
        self.bands
            .iter()
            .find(|band| pct >= band.min_percent)
            .unwrap_or_else(|| &self.bands[self.bands.len() - 1])
    }

    pub fn passed(&self, pct: f64) -> bool {
        pct >= self.pass_percent
    }

    pub fn bands(&self) -> &[GradeBandConfig] {
        &self.bands
    }
}

/// 单场考试的统计信息
pub fn exam_stats(
    exam_id: i64,
    scores: &[f64],
    max_score: f64,
    scale: &GradeScale,
) -> ExamStatsResponse {
    let percentages: Vec<f64> = scores.iter().map(|s| percentage(*s, max_score)).collect();

    let distribution = scale
        .bands()
        .iter()
        .map(|band| GradeCount {
            grade: band.grade.clone(),
            count: percentages
                .iter()
                .filter(|pct| scale.grade_for(**pct).grade == band.grade)
                .count() as i64,
        })
        .collect();

    let pass_rate = if percentages.is_empty() {
        None
    } else {
        let passed = percentages.iter().filter(|pct| scale.passed(**pct)).count();
        Some(percentage(passed as f64, percentages.len() as f64))
    };

    ExamStatsResponse {
        exam_id,
        count: scores.len() as i64,
        mean: mean(scores),
        min: scores.iter().copied().reduce(f64::min),
        max: scores.iter().copied().reduce(f64::max),
        pass_rate,
        distribution,
    }
}

/// 按科目汇总一名学生的成绩，按科目名称排序
pub fn subject_reports(rows: &[ScoreRow], scale: &GradeScale) -> Vec<SubjectReport> {
    let mut by_subject: BTreeMap<i64, Vec<&ScoreRow>> = BTreeMap::new();
    for row in rows {
        by_subject.entry(row.subject_id).or_default().push(row);
    }

    let mut reports: Vec<SubjectReport> = by_subject
        .into_iter()
        .filter_map(|(subject_id, exams)| {
            let pct = weighted_percentage(
                exams
                    .iter()
                    .map(|r| (percentage(r.score, r.max_score), r.weight)),
            )?;
            let band = scale.grade_for(pct);
            Some(SubjectReport {
                subject_id,
                subject_name: exams[0].subject_name.clone(),
                exam_count: exams.len() as i64,
                percentage: pct,
                grade: band.grade.clone(),
                remark: band.remark.clone(),
            })
        })
        .collect();

    reports.sort_by(|a, b| {
        a.subject_name
            .cmp(&b.subject_name)
            .then(a.subject_id.cmp(&b.subject_id))
    });
    reports
}

/// 总评：各科百分比的算术平均
pub fn overall_percentage(subjects: &[SubjectReport]) -> Option<f64> {
    let values: Vec<f64> = subjects.iter().map(|s| s.percentage).collect();
    mean(&values)
}

/// 班级排名中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub student_id: i64,
    pub overall_percentage: f64,
    pub position: i64,
}

/// 计算班级排名，只有有成绩的学生参与；按名次、学生ID排序
pub fn class_standings(rows: &[ScoreRow], scale: &GradeScale) -> Vec<Standing> {
    let mut by_student: BTreeMap<i64, Vec<ScoreRow>> = BTreeMap::new();
    for row in rows {
        by_student.entry(row.student_id).or_default().push(row.clone());
    }

    let overall: Vec<(i64, f64)> = by_student
        .into_iter()
        .filter_map(|(student_id, rows)| {
            overall_percentage(&subject_reports(&rows, scale)).map(|pct| (student_id, pct))
        })
        .collect();

    let values: Vec<f64> = overall.iter().map(|(_, pct)| *pct).collect();
    let mut standings: Vec<Standing> = overall
        .into_iter()
        .zip(rank_with_ties(&values))
        .map(|((student_id, overall_percentage), position)| Standing {
            student_id,
            overall_percentage,
            position,
        })
        .collect();

    standings.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then(a.student_id.cmp(&b.student_id))
    });
    standings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> GradeScale {
        GradeScale::from_config(&GradingConfig::default())
    }

    fn row(student_id: i64, subject_id: i64, score: f64, max: f64, weight: f64) -> ScoreRow {
        ScoreRow {
            student_id,
            subject_id,
            subject_name: format!("Subject {subject_id}"),
            score,
            max_score: max,
            weight,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(45.0, 50.0), 90.0);
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_weighted_percentage() {
        assert_eq!(weighted_percentage([(80.0, 1.0), (60.0, 3.0)]), Some(65.0));
        assert_eq!(weighted_percentage([(80.0, 0.0)]), None);
        assert_eq!(weighted_percentage(std::iter::empty()), None);
    }

    #[test]
    fn test_grade_for_boundaries() {
        let scale = scale();
        assert_eq!(scale.grade_for(100.0).grade, "A+");
        assert_eq!(scale.grade_for(90.0).grade, "A+");
        assert_eq!(scale.grade_for(89.99).grade, "A");
        assert_eq!(scale.grade_for(50.0).grade, "D");
        assert_eq!(scale.grade_for(0.0).grade, "F");
        // 低于所有分段时取最低一档
        assert_eq!(scale.grade_for(-5.0).grade, "F");
    }

    #[test]
    fn test_unsorted_config_is_sorted() {
        let mut config = GradingConfig::default();
        config.scale.reverse();
        let scale = GradeScale::from_config(&config);
        assert_eq!(scale.grade_for(95.0).grade, "A+");
        assert_eq!(scale.grade_for(65.0).grade, "C");
    }

    #[test]
    fn test_rank_with_ties() {
        assert_eq!(rank_with_ties(&[90.0, 80.0, 80.0, 70.0]), vec![1, 2, 2, 4]);
        assert_eq!(rank_with_ties(&[50.0, 75.0, 75.0]), vec![3, 1, 1]);
        assert!(rank_with_ties(&[]).is_empty());
    }

    #[test]
    fn test_exam_stats() {
        let stats = exam_stats(7, &[45.0, 30.0, 20.0], 50.0, &scale());
        assert_eq!(stats.exam_id, 7);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(31.67));
        assert_eq!(stats.min, Some(20.0));
        assert_eq!(stats.max, Some(45.0));
        // 90%, 60%, 40%：两人及格
        assert_eq!(stats.pass_rate, Some(66.67));

        let count_of = |grade: &str| {
            stats
                .distribution
                .iter()
                .find(|g| g.grade == grade)
                .map(|g| g.count)
        };
        assert_eq!(count_of("A+"), Some(1));
        assert_eq!(count_of("C"), Some(1));
        assert_eq!(count_of("F"), Some(1));
        assert_eq!(count_of("B"), Some(0));
    }

    #[test]
    fn test_exam_stats_without_results() {
        let stats = exam_stats(1, &[], 100.0, &scale());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.pass_rate, None);
        assert!(stats.distribution.iter().all(|g| g.count == 0));
    }

    #[test]
    fn test_subject_reports_use_weights() {
        let rows = vec![
            row(1, 2, 40.0, 50.0, 1.0),  // 80%
            row(1, 2, 60.0, 100.0, 3.0), // 60%
            row(1, 1, 95.0, 100.0, 1.0),
        ];
        let reports = subject_reports(&rows, &scale());
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].subject_name, "Subject 1");
        assert_eq!(reports[0].grade, "A+");
        assert_eq!(reports[1].exam_count, 2);
        assert_eq!(reports[1].percentage, 65.0);
        assert_eq!(reports[1].grade, "C");
        assert_eq!(overall_percentage(&reports), Some(80.0));
    }

    #[test]
    fn test_class_standings_share_positions() {
        let rows = vec![
            row(1, 1, 70.0, 100.0, 1.0),
            row(2, 1, 90.0, 100.0, 1.0),
            row(3, 1, 70.0, 100.0, 1.0),
            row(4, 1, 50.0, 100.0, 1.0),
        ];
        let standings = class_standings(&rows, &scale());
        let positions: Vec<(i64, i64)> = standings
            .iter()
            .map(|s| (s.student_id, s.position))
            .collect();
        assert_eq!(positions, vec![(2, 1), (1, 2), (3, 2), (4, 4)]);
    }
}
