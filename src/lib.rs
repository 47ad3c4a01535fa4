//! Course Analytics - 课程学情统计后端服务
//!
//! 基于 Actix Web 构建，提供课程概览、参与度趋势与作业按时情况统计。
//!
//! # 架构
//! - `analytics`: 统计核心计算（提交时间推断、按时情况汇总）
//! - `cache`: 统计结果缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod analytics;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
