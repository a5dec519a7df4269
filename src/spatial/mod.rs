//! 空间索引模块
//!
//! 为星图提供邻近查询功能，用于：
//! - 悬停测试（查找鼠标附近的星系）
//! - 邻居查询（查找某星系附近的其他星系）
//!
//! # 主要类型
//! - [`SystemGrid`][]: 基于均匀立方体格子的三维点索引
//! - [`CellKey`][]: 格子坐标

mod system_grid;

pub use system_grid::{CellKey, SystemGrid, DEFAULT_CELL_SIZE};
