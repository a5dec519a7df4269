//! 星系网格空间索引
//!
//! 将三维空间划分为均匀的立方体格子，快速查询星系之间的邻近关系。

use std::collections::HashMap;
use std::fmt;

use crate::models::{Point3, StarSystem};

/// 默认格子边长（与星图坐标单位相同）
pub const DEFAULT_CELL_SIZE: f32 = 50.0;

/// 格子坐标
///
/// 由 `floor(x / S), floor(y / S), floor(z / S)` 计算得到，不单独存储。
/// 字符串形式为 `"x,y,z"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellKey {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// 星系网格空间索引
///
/// 每个格子记录其中包含的星系索引（即传给 [`SystemGrid::rebuild`] 的切片下标）。
/// 一个星系只属于一个格子，由最近一次重建时的坐标决定。
/// 索引只支持整体重建，不支持单个星系的增删改。
///
/// # 示例
/// ```ignore
/// let mut grid = SystemGrid::default();
/// grid.rebuild(&systems);
///
/// // 查找某点附近的候选星系（立方体范围，可能包含半径外的星系）
/// for idx in grid.query_near(point, 30.0) {
///     println!("候选星系 {}", systems[idx as usize].id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SystemGrid {
    /// 每个格子的边长
    cell_size: f32,
    /// 格子坐标 -> 该格子内的星系索引（按插入顺序）
    cells: HashMap<CellKey, Vec<u32>>,
    /// 已索引的星系数量
    len: usize,
}

impl Default for SystemGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SystemGrid {
    /// 创建空索引
    ///
    /// 非正数或非有限的格子尺寸会回退到 [`DEFAULT_CELL_SIZE`]。
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            log::warn!("Invalid grid cell size {cell_size}, using {DEFAULT_CELL_SIZE}");
            DEFAULT_CELL_SIZE
        };

        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    /// 构建网格索引
    ///
    /// # 性能
    /// - 构建时间: O(n)
    /// - 空间复杂度: O(n + 非空格子数)
    pub fn build(systems: &[StarSystem], cell_size: f32) -> Self {
        let mut grid = Self::new(cell_size);
        grid.rebuild(systems);
        grid
    }

    /// 清空索引并重新插入所有星系
    ///
    /// 坐标非有限（缺失或 NaN）的星系会被跳过。
    pub fn rebuild(&mut self, systems: &[StarSystem]) {
        self.cells.clear();
        self.len = 0;

        let mut skipped = 0usize;
        for (idx, system) in systems.iter().enumerate() {
            if !system.position.is_finite() {
                skipped += 1;
                continue;
            }

            let key = self.cell_key_of(system.position);
            self.cells.entry(key).or_default().push(idx as u32);
            self.len += 1;
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} systems with non-finite coordinates");
        }
        log::debug!(
            "Rebuilt system grid: {} systems in {} cells (cell size {})",
            self.len,
            self.cells.len(),
            self.cell_size
        );
    }

    /// 计算点所在的格子坐标
    pub fn cell_key_of(&self, point: Point3) -> CellKey {
        CellKey::new(
            self.axis_cell(point.x),
            self.axis_cell(point.y),
            self.axis_cell(point.z),
        )
    }

    /// 枚举与查询立方体相交的所有格子
    ///
    /// 查询立方体以 `center` 为中心、边长为 `2 * radius`。
    /// 顺序为 x 最外层、z 最内层。半径小于等于 0 时只返回 `center` 所在的格子。
    pub fn neighbor_keys(&self, center: Point3, radius: f32) -> impl Iterator<Item = CellKey> {
        // NaN 也会被 max 处理为 0
        let radius = radius.max(0.0);
        let min = self.cell_key_of(Point3::new(
            center.x - radius,
            center.y - radius,
            center.z - radius,
        ));
        let max = self.cell_key_of(Point3::new(
            center.x + radius,
            center.y + radius,
            center.z + radius,
        ));

        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y)
                .flat_map(move |y| (min.z..=max.z).map(move |z| CellKey::new(x, y, z)))
        })
    }

    /// 查询某点附近的候选星系
    ///
    /// 返回 [`Self::neighbor_keys`] 中所有格子的星系索引，
    /// 先按格子枚举顺序，再按格子内插入顺序。
    /// 结果是立方体范围的超集：不会漏掉半径内的星系，但可能包含半径外的星系。
    ///
    /// # 性能
    /// - O(范围内格子数 + 结果数)，半径没有上限
    pub fn query_near(&self, point: Point3, radius: f32) -> Vec<u32> {
        if !point.is_finite() || self.is_empty() {
            return Vec::new();
        }

        let mut result = Vec::new();
        for key in self.neighbor_keys(point, radius) {
            if let Some(cell) = self.cells.get(&key) {
                result.extend_from_slice(cell);
            }
        }
        result
    }

    /// 与 [`Self::query_near`] 相同，但直接返回星系引用
    pub fn query_systems<'a>(
        &self,
        systems: &'a [StarSystem],
        point: Point3,
        radius: f32,
    ) -> Vec<&'a StarSystem> {
        self.query_near(point, radius)
            .into_iter()
            .filter_map(|idx| systems.get(idx as usize))
            .collect()
    }

    /// 查询球形范围内的星系（精确筛选）
    ///
    /// # 参数
    /// - `systems`: 重建时使用的星系切片
    /// - `point`: 球心
    /// - `radius`: 半径
    pub fn query_within(&self, systems: &[StarSystem], point: Point3, radius: f32) -> Vec<u32> {
        // 先用立方体粗筛
        let candidates = self.query_near(point, radius);

        // 精确筛选
        let radius_sq = radius * radius;
        candidates
            .into_iter()
            .filter(|&idx| {
                systems
                    .get(idx as usize)
                    .is_some_and(|s| s.position.distance_sq(point) <= radius_sq)
            })
            .collect()
    }

    /// 查找半径内距离最近的星系
    ///
    /// 半径内没有星系时返回 None
    pub fn find_nearest(&self, systems: &[StarSystem], point: Point3, radius: f32) -> Option<u32> {
        self.query_within(systems, point, radius)
            .into_iter()
            .min_by(|&a, &b| {
                let da = systems[a as usize].position.distance_sq(point);
                let db = systems[b as usize].position.distance_sq(point);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// 获取某个格子内的星系索引
    pub fn cell(&self, key: &CellKey) -> &[u32] {
        self.cells.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 获取格子尺寸
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// 已索引的星系数量
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 非空格子数量
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// 统计信息：(非空格子数, 星系数, 单个格子最多星系数)
    pub fn stats(&self) -> (usize, usize, usize) {
        let max_per_cell = self.cells.values().map(Vec::len).max().unwrap_or(0);
        (self.cells.len(), self.len, max_per_cell)
    }

    // ========================================================================
    // 内部方法
    // ========================================================================

    /// 单个坐标轴上的格子坐标
    fn axis_cell(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }
}
