//! 网格快照与关卡文档之间的转换

use std::collections::HashSet;

use tracing::debug;

use crate::constants::CELL_SIZE;
use crate::coords::{Cell, PixelPoint};
use crate::document::{
    EnemyEntry, LevelDocument, LevelLayout, LevelMetadata, PlayerEntry, StaticEntry,
};
use crate::error::{LevelError, Result};
use crate::grid::{GridModel, GridSnapshot};
use crate::tile::{Collection, DocumentSubtype, Singleton, TileKind};

/// 关卡编解码
pub struct LevelCodec;

impl LevelCodec {
    /// 由网格快照生成文档
    ///
    /// 不要求快照已就绪，未放置的单例直接省略。
    pub fn export(snapshot: &GridSnapshot, metadata: &LevelMetadata) -> LevelDocument {
        let mut players = Vec::new();
        for singleton in [Singleton::Player1, Singleton::Player2] {
            if let Some(cell) = snapshot.singleton(singleton) {
                if let Some(subtype) = singleton.tile().subtype() {
                    players.push(PlayerEntry {
                        subtype,
                        position: cell.to_pixel(),
                    });
                }
            }
        }

        let mut enemies = Vec::new();
        let mut static_objects = Vec::new();
        for (cell, kind) in snapshot.iter() {
            // 单例由跟踪位置单独输出
            if kind.singleton().is_some() {
                continue;
            }
            let Some(subtype) = kind.subtype() else {
                continue;
            };
            match subtype.collection() {
                Collection::Enemies => enemies.push(EnemyEntry {
                    id: enemy_id(cell),
                    subtype,
                    position: cell.to_pixel(),
                }),
                Collection::StaticObjects => static_objects.push(StaticEntry {
                    subtype,
                    position: cell.to_pixel(),
                }),
                Collection::Players => {}
            }
        }

        if let Some(cell) = snapshot.base {
            static_objects.push(StaticEntry {
                subtype: DocumentSubtype::BaseBlock,
                position: cell.to_pixel(),
            });
        }

        let document = LevelDocument {
            metadata: metadata.clone(),
            layout: LevelLayout {
                width: snapshot.cols as i32 * CELL_SIZE,
                height: snapshot.rows as i32 * CELL_SIZE,
                cols: snapshot.cols,
                rows: snapshot.rows,
            },
            players,
            enemies,
            static_objects,
        };
        debug!(
            "导出关卡: {} 个玩家, {} 个敌人, {} 个静态物体",
            document.players.len(),
            document.enemies.len(),
            document.static_objects.len()
        );
        document
    }

    /// 由文档构造新的网格模型
    ///
    /// 先把所有条目解析到单元格并检查越界、重叠和重复单例，全部通过后
    /// 才写入一个全新的模型；任何错误都不会产生部分填充的网格。
    pub fn import(document: &LevelDocument) -> Result<GridModel> {
        let mut model = GridModel::new(document.layout.rows, document.layout.cols);

        let players = document
            .players
            .iter()
            .map(|player| (player.subtype, player.position, "player"));
        let (base, terrain): (Vec<&StaticEntry>, Vec<&StaticEntry>) = document
            .static_objects
            .iter()
            .partition(|object| object.subtype == DocumentSubtype::BaseBlock);
        let base = base
            .into_iter()
            .map(|object| (object.subtype, object.position, "staticObject"));
        let enemies = document
            .enemies
            .iter()
            .map(|enemy| (enemy.subtype, enemy.position, "enemy"));
        let terrain = terrain
            .into_iter()
            .map(|object| (object.subtype, object.position, "staticObject"));

        // 玩家、基地、敌人、其余静态物体
        let mut resolved: Vec<(Cell, TileKind)> = Vec::with_capacity(document.entry_count());
        let mut occupied = HashSet::new();
        let mut singletons = HashSet::new();
        for (subtype, position, element) in players.chain(base).chain(enemies).chain(terrain) {
            let cell = resolve_cell(&model, position, element)?;
            let kind = subtype.tile();
            if let Some(singleton) = kind.singleton() {
                if !singletons.insert(singleton) {
                    return Err(LevelError::DuplicateSingleton {
                        name: singleton.label().to_string(),
                    });
                }
            }
            if !occupied.insert(cell) {
                return Err(LevelError::CellConflict {
                    row: cell.row,
                    col: cell.col,
                });
            }
            resolved.push((cell, kind));
        }

        for (cell, kind) in resolved {
            model.place(cell.row as i64, cell.col as i64, kind);
        }

        debug!(
            "导入关卡 {:?}: {}x{}, {} 个条目",
            document.metadata.name,
            document.layout.rows,
            document.layout.cols,
            document.entry_count()
        );
        Ok(model)
    }
}

/// 敌人的合成 ID
fn enemy_id(cell: Cell) -> String {
    format!("enemy{}_{}", cell.row, cell.col)
}

fn resolve_cell(model: &GridModel, position: PixelPoint, element: &str) -> Result<Cell> {
    let (row, col) = position.to_grid();
    model
        .cell_at(row, col)
        .ok_or_else(|| LevelError::CellOutOfRange {
            element: element.to_string(),
            x: position.x,
            y: position.y,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_model() -> GridModel {
        let mut model = GridModel::default();
        model.place(12, 4, TileKind::Player1);
        model.place(12, 8, TileKind::Player2);
        model.place(12, 6, TileKind::Base);
        model.place(11, 5, TileKind::Brick);
        model.place(11, 6, TileKind::Steel);
        model.place(11, 7, TileKind::Brick);
        model.place(6, 0, TileKind::Water);
        model.place(6, 12, TileKind::Forest);
        model.place(0, 0, TileKind::EnemyRegular);
        model.place(0, 6, TileKind::EnemyFast);
        model.place(0, 12, TileKind::EnemyHeavy);
        model.place(1, 6, TileKind::EnemyPowerful);
        model
    }

    fn sorted(document: &LevelDocument) -> (Vec<String>, Vec<String>, Vec<String>) {
        let mut players: Vec<String> = document
            .players
            .iter()
            .map(|p| format!("{} {:?}", p.subtype, p.position))
            .collect();
        let mut enemies: Vec<String> = document
            .enemies
            .iter()
            .map(|e| format!("{} {} {:?}", e.id, e.subtype, e.position))
            .collect();
        let mut statics: Vec<String> = document
            .static_objects
            .iter()
            .map(|s| format!("{} {:?}", s.subtype, s.position))
            .collect();
        players.sort();
        enemies.sort();
        statics.sort();
        (players, enemies, statics)
    }

    #[test]
    fn test_export_entries() {
        let snapshot = ready_model().snapshot();
        let document = LevelCodec::export(&snapshot, &LevelMetadata::default());

        assert_eq!(document.players.len(), 2);
        assert_eq!(document.enemies.len(), 4);
        // 5 块地形 + 基地
        assert_eq!(document.static_objects.len(), 6);
        assert_eq!(document.layout.width, 13 * CELL_SIZE);

        let base = document.static_objects.last().unwrap();
        assert_eq!(base.subtype, DocumentSubtype::BaseBlock);
        assert_eq!(base.position, Cell::new(12, 6).to_pixel());

        let fast = document
            .enemies
            .iter()
            .find(|e| e.subtype == DocumentSubtype::FastEnemy)
            .unwrap();
        assert_eq!(fast.id, "enemy0_6");
    }

    #[test]
    fn test_every_non_empty_cell_has_one_entry() {
        let snapshot = ready_model().snapshot();
        let document = LevelCodec::export(&snapshot, &LevelMetadata::default());
        let non_empty = snapshot
            .iter()
            .filter(|(_, kind)| *kind != TileKind::Empty)
            .count();
        assert_eq!(document.entry_count(), non_empty);
    }

    #[test]
    fn test_export_without_player2() {
        let mut model = ready_model();
        model.place(12, 8, TileKind::Empty);
        let snapshot = model.snapshot();
        assert!(!snapshot.readiness().is_ready());

        let document = LevelCodec::export(&snapshot, &LevelMetadata::default());
        assert_eq!(document.players.len(), 1);
        assert!(document
            .players
            .iter()
            .all(|p| p.subtype != DocumentSubtype::Player2));
    }

    #[test]
    fn test_export_empty_grid() {
        let document = LevelCodec::export(&GridModel::default().snapshot(), &LevelMetadata::default());
        assert_eq!(document.entry_count(), 0);
    }

    #[test]
    fn test_singleton_exported_once() {
        let mut model = GridModel::default();
        model.place(2, 2, TileKind::Player1);
        model.place(2, 2, TileKind::Player1);
        let document = LevelCodec::export(&model.snapshot(), &LevelMetadata::default());
        assert_eq!(document.players.len(), 1);
        assert_eq!(document.players[0].position, Cell::new(2, 2).to_pixel());
    }

    #[test]
    fn test_import_roundtrip() {
        let model = ready_model();
        let snapshot = model.snapshot();
        let document = LevelCodec::export(&snapshot, &LevelMetadata::default());

        let imported = LevelCodec::import(&document).unwrap();
        assert_eq!(imported.snapshot(), snapshot);

        let again = LevelCodec::export(&imported.snapshot(), &LevelMetadata::default());
        assert_eq!(sorted(&again), sorted(&document));
    }

    #[test]
    fn test_roundtrip_random_sequence() {
        let mut model = GridModel::new(5, 6);
        let kinds = TileKind::ALL;
        let mut seed: u64 = 987654321;
        let mut ready = 0;
        for _ in 0..1500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let row = ((seed >> 33) % 5) as i64;
            let col = ((seed >> 17) % 6) as i64;
            let kind = kinds[((seed >> 41) % kinds.len() as u64) as usize];
            if model.place(row, col, kind).is_none() {
                continue;
            }

            let snapshot = model.snapshot();
            if !snapshot.readiness().is_ready() {
                continue;
            }
            ready += 1;
            let document = LevelCodec::export(&snapshot, &LevelMetadata::default());
            assert_eq!(document.entry_count(), snapshot.iter().filter(|(_, k)| *k != TileKind::Empty).count());
            assert_eq!(LevelCodec::import(&document).unwrap().snapshot(), snapshot);
        }
        assert!(ready > 0);
    }

    #[test]
    fn test_import_through_xml() {
        let snapshot = ready_model().snapshot();
        let xml = LevelCodec::export(&snapshot, &LevelMetadata::default())
            .to_xml()
            .unwrap();
        let document = LevelDocument::parse(&xml).unwrap();
        assert_eq!(LevelCodec::import(&document).unwrap().snapshot(), snapshot);
    }

    #[test]
    fn test_import_non_square_grid() {
        let mut model = GridModel::new(4, 9);
        model.place(3, 8, TileKind::Player1);
        model.place(0, 0, TileKind::Player2);
        model.place(3, 0, TileKind::Base);
        model.place(2, 5, TileKind::Water);
        let snapshot = model.snapshot();

        let document = LevelCodec::export(&snapshot, &LevelMetadata::default());
        assert_eq!(document.layout.width, 9 * CELL_SIZE);
        assert_eq!(document.layout.height, 4 * CELL_SIZE);
        assert_eq!(LevelCodec::import(&document).unwrap().snapshot(), snapshot);
    }

    #[test]
    fn test_base_is_singleton_on_import() {
        let snapshot = ready_model().snapshot();
        let document = LevelCodec::export(&snapshot, &LevelMetadata::default());
        let imported = LevelCodec::import(&document).unwrap();
        assert_eq!(imported.singleton(Singleton::Base), Some(Cell::new(12, 6)));
        assert!(imported.readiness().is_ready());
    }

    #[test]
    fn test_import_out_of_range() {
        let mut document = LevelCodec::export(&ready_model().snapshot(), &LevelMetadata::default());
        document.enemies[0].position = PixelPoint::new(5, 23);
        assert!(matches!(
            LevelCodec::import(&document),
            Err(LevelError::CellOutOfRange { .. })
        ));

        document.enemies[0].position = Cell::new(13, 0).to_pixel();
        assert!(matches!(
            LevelCodec::import(&document),
            Err(LevelError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn test_import_conflict() {
        let mut document = LevelCodec::export(&ready_model().snapshot(), &LevelMetadata::default());
        // 敌人放到玩家 1 的位置上
        document.enemies[0].position = Cell::new(12, 4).to_pixel();
        match LevelCodec::import(&document) {
            Err(LevelError::CellConflict { row, col }) => assert_eq!((row, col), (12, 4)),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_import_duplicate_base() {
        let mut document = LevelCodec::export(&ready_model().snapshot(), &LevelMetadata::default());
        document.static_objects.push(StaticEntry {
            subtype: DocumentSubtype::BaseBlock,
            position: Cell::new(5, 5).to_pixel(),
        });
        assert!(matches!(
            LevelCodec::import(&document),
            Err(LevelError::DuplicateSingleton { .. })
        ));
    }

    #[test]
    fn test_import_accepts_off_centre_pixels() {
        let mut document = LevelCodec::export(&ready_model().snapshot(), &LevelMetadata::default());
        // 同一单元格内偏离中心的坐标仍落在该单元格
        let centre = Cell::new(6, 0).to_pixel();
        let water = document
            .static_objects
            .iter_mut()
            .find(|s| s.subtype == DocumentSubtype::WaterBlock)
            .unwrap();
        water.position = PixelPoint::new(centre.x + 10, centre.y + 45);
        let imported = LevelCodec::import(&document).unwrap();
        assert_eq!(imported.get(Cell::new(6, 0)), Some(TileKind::Water));
    }
}
