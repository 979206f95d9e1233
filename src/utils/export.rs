//! CSV 导出

use actix_web::HttpResponse;

use crate::errors::Result;
use crate::models::fees::entities::FeeWithBalance;
use crate::models::results::entities::ResultDetail;
use crate::models::students::entities::StudentWithClass;

/// 可以写成一行 CSV 的记录
pub trait CsvRow {
    fn header() -> &'static [&'static str];
    fn record(&self) -> Vec<String>;
}

/// 写出表头和全部记录；没有记录时只有表头
pub fn write_csv<R: CsvRow>(rows: &[R]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(R::header())?;
    for row in rows {
        wtr.write_record(row.record().into_iter().map(escape_formula))?;
    }
    wtr.into_inner()
        .map_err(|e| crate::errors::SchoolDeskError::export(format!("CSV 生成失败: {e}")))
}

/// 表格软件会把 `=`、`+`、`-`、`@` 开头的单元格当作公式，文本前加 `'`；数字保持原样
fn escape_formula(cell: String) -> String {
    let risky = cell.starts_with(['=', '+', '-', '@', '\t', '\r']);
    if risky && cell.parse::<f64>().is_err() {
        format!("'{cell}")
    } else {
        cell
    }
}

/// 以附件形式返回 CSV
pub fn csv_attachment(filename: &str, data: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(data)
}

/// 分转换为两位小数的金额
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

impl CsvRow for StudentWithClass {
    fn header() -> &'static [&'static str] {
        &[
            "id",
            "admission_no",
            "first_name",
            "last_name",
            "gender",
            "birthday",
            "class",
            "status",
            "guardian_name",
            "guardian_phone",
            "enrolled_at",
        ]
    }

    fn record(&self) -> Vec<String> {
        let s = &self.student;
        vec![
            s.id.to_string(),
            s.admission_no.clone(),
            s.first_name.clone(),
            s.last_name.clone(),
            s.gender.to_string(),
            s.birthday.map(|d| d.to_string()).unwrap_or_default(),
            self.class_name.clone().unwrap_or_default(),
            s.status.to_string(),
            s.guardian_name.clone().unwrap_or_default(),
            s.guardian_phone.clone().unwrap_or_default(),
            s.enrolled_at.to_rfc3339(),
        ]
    }
}

impl CsvRow for ResultDetail {
    fn header() -> &'static [&'static str] {
        &[
            "admission_no",
            "student_name",
            "exam",
            "subject",
            "term",
            "score",
            "max_score",
            "percentage",
            "remark",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.admission_no.clone().unwrap_or_default(),
            self.student_name.clone().unwrap_or_default(),
            self.exam_title.clone(),
            self.subject_name.clone().unwrap_or_default(),
            self.term.clone(),
            self.result.score.to_string(),
            self.max_score.to_string(),
            format!("{:.2}", self.percentage),
            self.result.remark.clone().unwrap_or_default(),
        ]
    }
}

impl CsvRow for FeeWithBalance {
    fn header() -> &'static [&'static str] {
        &[
            "id",
            "student_id",
            "student_name",
            "title",
            "term",
            "amount",
            "paid",
            "balance",
            "status",
            "due_date",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.fee.id.to_string(),
            self.fee.student_id.to_string(),
            self.student_name.clone().unwrap_or_default(),
            self.fee.title.clone(),
            self.fee.term.clone(),
            format_cents(self.fee.amount_cents),
            format_cents(self.paid_cents),
            format_cents(self.balance_cents),
            self.status.to_string(),
            self.fee.due_date.format("%Y-%m-%d").to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::Fee;
    use chrono::{TimeZone, Utc};

    fn fee_row(title: &str, amount: i64, paid: i64) -> FeeWithBalance {
        let due = Utc.with_ymd_and_hms(2030, 1, 31, 0, 0, 0).unwrap();
        let fee = Fee {
            id: 3,
            student_id: 9,
            title: title.to_string(),
            term: "2025-T1".to_string(),
            amount_cents: amount,
            due_date: due,
            created_at: due,
            updated_at: due,
        };
        FeeWithBalance::new(fee, Some("Ada Lovelace".to_string()), paid, due)
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(123456), "1234.56");
        assert_eq!(format_cents(-250), "-2.50");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let data = write_csv::<FeeWithBalance>(&[]).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(
            text,
            "id,student_id,student_name,title,term,amount,paid,balance,status,due_date\n"
        );
    }

    #[test]
    fn test_formula_cells_are_escaped() {
        assert_eq!(escape_formula("=HYPERLINK(\"x\")".into()), "'=HYPERLINK(\"x\")");
        assert_eq!(escape_formula("@SUM(A1)".into()), "'@SUM(A1)");
        assert_eq!(escape_formula("-1+2|cmd".into()), "'-1+2|cmd");
        assert_eq!(escape_formula("-2.50".into()), "-2.50");
        assert_eq!(escape_formula("Ada".into()), "Ada");

        let rows = vec![fee_row("=1+1", 50000, 0)];
        let text = String::from_utf8(write_csv(&rows).unwrap()).unwrap();
        assert!(text.lines().nth(1).unwrap().contains(",'=1+1,"));
    }

    #[test]
    fn test_fee_rows_are_quoted_when_needed() {
        let rows = vec![fee_row("Tuition, term 1", 50000, 20000)];
        let text = String::from_utf8(write_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "3,9,Ada Lovelace,\"Tuition, term 1\",2025-T1,500.00,200.00,300.00,partial,2030-01-31"
        );
    }
}
