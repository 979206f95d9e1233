//! 收费与缴费存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, normalize_page};
use crate::entity::fee_payments::{
    ActiveModel as PaymentActiveModel, Column as PaymentColumn, Entity as FeePayments,
};
use crate::entity::fees::{ActiveModel, Column, Entity as Fees, Model as FeeModel};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    fees::{
        entities::{Fee, FeePayment, FeeWithBalance},
        requests::{CreateFeeRequest, FeeListQuery, RecordPaymentRequest, UpdateFeeRequest},
        responses::{FeeListResponse, FeeSummary},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

/// 批量统计收费项的已缴金额
async fn paid_amounts<C: ConnectionTrait>(db: &C, fee_ids: Vec<i64>) -> Result<HashMap<i64, i64>> {
    if fee_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, i64)> = FeePayments::find()
        .select_only()
        .column(PaymentColumn::FeeId)
        .column(PaymentColumn::AmountCents)
        .filter(PaymentColumn::FeeId.is_in(fee_ids))
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("查询缴费记录失败: {e}")))?;

    let mut paid = HashMap::new();
    for (fee_id, amount) in rows {
        *paid.entry(fee_id).or_insert(0) += amount;
    }
    Ok(paid)
}

impl SeaOrmStorage {
    pub async fn create_fee_impl(&self, req: CreateFeeRequest) -> Result<Fee> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            title: Set(req.title),
            term: Set(req.term),
            amount_cents: Set(req.amount_cents),
            due_date: Set(req.due_date.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建收费项失败: {e}")))?;

        Ok(result.into_fee())
    }

    pub async fn get_fee_by_id_impl(&self, id: i64) -> Result<Option<FeeWithBalance>> {
        let result = Fees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项失败: {e}")))?;

        match result {
            Some(model) => Ok(self.with_balances(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 分页列出收费项。状态由缴费进度推导，按状态筛选时在内存中过滤后分页
    pub async fn list_fees_with_pagination_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<FeeListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        if query.status.is_some() {
            let rows = self.list_fees_for_export_impl(query).await?;
            let total = rows.len() as u64;
            let items = rows
                .into_iter()
                .skip(((page - 1) * size) as usize)
                .take(size as usize)
                .collect();
            return Ok(FeeListResponse {
                items,
                pagination: PaginationInfo {
                    page: page as i64,
                    page_size: size as i64,
                    total: total as i64,
                    total_pages: total.div_ceil(size) as i64,
                },
            });
        }

        let paginator = self.filtered_fees(&query).await?.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项页数失败: {e}")))?;
        let fees = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项列表失败: {e}")))?;

        Ok(FeeListResponse {
            items: self.with_balances(fees).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_fees_for_export_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<Vec<FeeWithBalance>> {
        let fees = self
            .filtered_fees(&query)
            .await?
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项列表失败: {e}")))?;

        let rows = self.with_balances(fees).await?;
        Ok(match query.status {
            Some(status) => rows.into_iter().filter(|r| r.status == status).collect(),
            None => rows,
        })
    }

    pub async fn update_fee_impl(&self, id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>> {
        if Fees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(term) = update.term {
            model.term = Set(term);
        }
        if let Some(amount_cents) = update.amount_cents {
            model.amount_cents = Set(amount_cents);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新收费项失败: {e}")))?;

        Ok(Some(updated.into_fee()))
    }

    /// 删除收费项，缴费记录随外键级联删除
    pub async fn delete_fee_impl(&self, id: i64) -> Result<bool> {
        let result = Fees::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除收费项失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_fee_payments_impl(&self, fee_id: i64) -> Result<Vec<FeePayment>> {
        let payments = FeePayments::find()
            .filter(PaymentColumn::FeeId.eq(fee_id))
            .order_by_asc(PaymentColumn::PaidAt)
            .order_by_asc(PaymentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询缴费记录失败: {e}")))?;

        Ok(payments.into_iter().map(|m| m.into_payment()).collect())
    }

    /// 登记缴费，余额校验与写入在同一事务中完成
    pub async fn record_payment_impl(
        &self,
        fee_id: i64,
        payment: RecordPaymentRequest,
        received_by: i64,
    ) -> Result<FeePayment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let fee = Fees::find_by_id(fee_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收费项失败: {e}")))?
            .ok_or_else(|| SchoolDeskError::not_found(format!("收费项 {fee_id} 不存在")))?;

        let paid = paid_amounts(&txn, vec![fee_id])
            .await?
            .get(&fee_id)
            .copied()
            .unwrap_or(0);
        let balance = fee.amount_cents - paid;

        if payment.amount_cents <= 0 || payment.amount_cents > balance {
            return Err(SchoolDeskError::validation(format!(
                "缴费金额必须大于 0 且不超过余额 {balance}"
            )));
        }

        let saved = PaymentActiveModel {
            fee_id: Set(fee_id),
            amount_cents: Set(payment.amount_cents),
            method: Set(payment.method.to_string()),
            reference: Set(payment.reference),
            received_by: Set(Some(received_by)),
            paid_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("登记缴费失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_payment())
    }

    pub async fn fee_summary_impl(&self, term: Option<String>) -> Result<FeeSummary> {
        let rows = self
            .list_fees_for_export_impl(FeeListQuery {
                term: term.clone(),
                ..Default::default()
            })
            .await?;

        Ok(FeeSummary::from_rows(term, &rows))
    }

    async fn filtered_fees(&self, query: &FeeListQuery) -> Result<Select<Fees>> {
        let mut select = Fees::find();

        if let Some(ids) = self.scoped_student_ids(&query.scope).await? {
            select = select.filter(Column::StudentId.is_in(ids));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(ref term) = query.term
            && !term.trim().is_empty()
        {
            select = select.filter(Column::Term.eq(term.trim()));
        }

        Ok(select
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id))
    }

    async fn with_balances(&self, fees: Vec<FeeModel>) -> Result<Vec<FeeWithBalance>> {
        let fee_ids: Vec<i64> = fees.iter().map(|f| f.id).collect();
        let student_ids: Vec<i64> = fees.iter().map(|f| f.student_id).collect();

        let paid = paid_amounts(&self.db, fee_ids).await?;
        let students = self.student_names(student_ids).await?;
        let now = chrono::Utc::now();

        Ok(fees
            .into_iter()
            .map(|m| {
                let paid_cents = paid.get(&m.id).copied().unwrap_or(0);
                let student_name = students.get(&m.student_id).map(|(name, _)| name.clone());
                FeeWithBalance::new(m.into_fee(), student_name, paid_cents, now)
            })
            .collect())
    }
}
