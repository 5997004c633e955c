// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::phone_webhook::{PhoneWebhookPayload, PhoneWebhookResponseDto};
use crate::domain::repositories::employee_repository::EmployeeRepository;
use crate::domain::repositories::lead_repository::LeadRepository;
use crate::domain::repositories::RepositoryError;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 电话号码回调用例
///
/// 处理外部联系人源异步送达的电话号码：按外部联系人ID升级
/// 员工电话字段，再清除对应线索上的待送达标记。
/// 单个联系人的升级失败只记录日志并跳过。
pub struct PhoneWebhookUseCase {
    employee_repo: Arc<dyn EmployeeRepository>,
    lead_repo: Arc<dyn LeadRepository>,
}

impl PhoneWebhookUseCase {
    /// 创建新的电话号码回调用例实例
    pub fn new(
        employee_repo: Arc<dyn EmployeeRepository>,
        lead_repo: Arc<dyn LeadRepository>,
    ) -> Self {
        Self {
            employee_repo,
            lead_repo,
        }
    }

    /// 处理一次回调载荷
    pub async fn handle(
        &self,
        payload: &PhoneWebhookPayload,
    ) -> Result<PhoneWebhookResponseDto, RepositoryError> {
        let mut updated_employee_ids: Vec<Uuid> = Vec::new();

        for person in &payload.people {
            let Some(number) = person.best_number() else {
                debug!(apollo_id = %person.id, "Webhook person carried no number, skipping");
                continue;
            };

            match self
                .employee_repo
                .upgrade_phone_by_apollo_id(&person.id, number)
                .await
            {
                Ok(ids) => updated_employee_ids.extend(ids),
                Err(e) => {
                    warn!(apollo_id = %person.id, error = %e, "Phone upgrade failed, skipping");
                }
            }
        }

        let leads_cleared = if updated_employee_ids.is_empty() {
            0
        } else {
            self.lead_repo
                .clear_phone_pending_for_employees(&updated_employee_ids)
                .await?
        };

        info!(
            employees = updated_employee_ids.len(),
            leads_cleared, "Phone webhook processed"
        );

        Ok(PhoneWebhookResponseDto {
            employees_updated: updated_employee_ids.len(),
            leads_cleared,
        })
    }
}

#[cfg(test)]
#[path = "phone_webhook_test.rs"]
mod tests;
