// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、抓取调度、联系人充实和 Webhook 等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取运行配置
    pub scraping: ScrapingSettings,
    /// 联系人充实配置
    pub enrichment: EnrichmentSettings,
    /// 外部数据源配置
    pub providers: ProviderSettings,
    /// Webhook 配置
    pub webhook: WebhookSettings,
    /// 积分配置
    pub credits: CreditsSettings,
    /// 指标暴露配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取运行配置设置
#[derive(Debug, Deserialize)]
pub struct ScrapingSettings {
    /// 单个抓取任务的硬超时（秒），必须小于整体运行预算
    pub task_timeout_secs: u64,
    /// 运行记录的过期阈值（秒），超过后被清理器标记为失败
    pub stale_after_secs: i64,
}

/// 联系人充实配置设置
#[derive(Debug, Deserialize)]
pub struct EnrichmentSettings {
    /// 员工缓存的新鲜度窗口（小时）
    pub cache_ttl_hours: i64,
    /// 相邻公司之间的固定延迟（毫秒），用于遵守外部限流
    pub company_delay_ms: u64,
    /// 批量匹配单次请求的最大 ID 数
    pub bulk_match_chunk_size: usize,
    /// 非 fetch_all 模式下单个域名返回的员工数上限
    pub page_size: u32,
}

/// 外部数据源配置设置
#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    /// 职位数据源 API 地址
    pub job_source_url: String,
    /// 职位数据源 API 密钥
    pub job_source_api_key: String,
    /// 联系人充实服务 API 地址
    pub apollo_url: String,
    /// 联系人充实服务 API 密钥
    pub apollo_api_key: String,
    /// 外部请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// Webhook配置设置
#[derive(Debug, Deserialize)]
pub struct WebhookSettings {
    /// Webhook签名密钥
    pub secret: String,
    /// 电话号码回调的外部可达基础地址
    pub callback_base_url: String,
}

/// 积分配置设置
#[derive(Debug, Deserialize)]
pub struct CreditsSettings {
    /// 新组织的默认积分额度
    pub default_limit: i64,
}

/// 指标暴露配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 暴露器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.url", "postgres://localhost:5432/prospectrs")?
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default scraping settings
            .set_default("scraping.task_timeout_secs", 120)?
            .set_default("scraping.stale_after_secs", 600)?
            // Default enrichment settings
            .set_default("enrichment.cache_ttl_hours", 168)?
            .set_default("enrichment.company_delay_ms", 500)?
            .set_default("enrichment.bulk_match_chunk_size", 10)?
            .set_default("enrichment.page_size", 25)?
            // Default provider settings
            .set_default("providers.job_source_url", "https://api.jobsource.example")?
            .set_default("providers.job_source_api_key", "")?
            .set_default("providers.apollo_url", "https://api.apollo.io")?
            .set_default("providers.apollo_api_key", "")?
            .set_default("providers.request_timeout_secs", 90)?
            // Default Webhook settings
            .set_default("webhook.secret", "your-secret-key")?
            .set_default("webhook.callback_base_url", "http://localhost:3000")?
            // Default credits settings
            .set_default("credits.default_limit", 1000)?
            // Default metrics settings
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PROSPECTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
