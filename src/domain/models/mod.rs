// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 搜索（search）：一组抓取配置的逻辑容器
/// - 抓取运行（scraper_run）：单个抓取配置的一次执行及其生命周期
/// - 公司（company）、职位（job）：抓取结果的去重落库形态
/// - 员工（employee）、线索（lead）：联系人充实产生的实体
/// - 积分（credits）：组织级的用量计数与审计记录
/// - 充实（enrichment）：缓存员工记录与批次审计
///
/// 这些模型构成了系统的数据基础，定义了业务概念的
/// 结构和行为，是领域驱动设计的核心组成部分。
pub mod company;
pub mod credits;
pub mod employee;
pub mod enrichment;
pub mod job;
pub mod lead;
pub mod scraper_run;
pub mod search;
