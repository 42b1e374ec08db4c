//! 项目记录
//!
//! 一次扫描的元数据加上不透明的房间载荷。载荷是带版本号的 JSON 信封，
//! 每次需要投影时重新解码，不缓存；解码失败是可恢复的结果，不会中止程序。

use crate::error::FileError;
use chrono::{DateTime, Utc};
use floorplan_core::projector::{project, ProjectionResult};
use floorplan_core::scan::RoomScan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 当前载荷格式版本
pub const PAYLOAD_FORMAT_VERSION: u32 = 1;

/// 物业类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    #[default]
    House,
    Townhouse,
    Commercial,
    Other,
}

impl PropertyType {
    /// 供选择器使用的全部类型
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Townhouse,
        PropertyType::Commercial,
        PropertyType::Other,
    ];

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Commercial => "Commercial",
            PropertyType::Other => "Other",
        }
    }

    /// 存储用的原始值
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Commercial => "commercial",
            PropertyType::Other => "other",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PropertyType {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FileError::InvalidFormat(format!("Unknown property type: {}", s)))
    }
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    format_version: u32,
    room: &'a RoomScan,
}

#[derive(Deserialize)]
struct PayloadHeader {
    format_version: u32,
}

#[derive(Deserialize)]
struct Payload {
    room: RoomScan,
}

/// 编码房间载荷；含非有限数值时失败
pub fn encode_payload(room: &RoomScan) -> Result<Vec<u8>, FileError> {
    if let Some(index) = room.first_non_finite_wall() {
        return Err(FileError::EncodingFailure(format!(
            "wall {} contains a non-finite value",
            index
        )));
    }

    serde_json::to_vec(&PayloadRef {
        format_version: PAYLOAD_FORMAT_VERSION,
        room,
    })
    .map_err(|e| FileError::EncodingFailure(e.to_string()))
}

/// 解码房间载荷
pub fn decode_payload(bytes: &[u8]) -> Result<RoomScan, FileError> {
    let header: PayloadHeader =
        serde_json::from_slice(bytes).map_err(|e| FileError::DecodingFailure(e.to_string()))?;

    if header.format_version > PAYLOAD_FORMAT_VERSION {
        return Err(FileError::DecodingFailure(format!(
            "payload version {} is newer than supported version {}",
            header.format_version, PAYLOAD_FORMAT_VERSION
        )));
    }

    let payload: Payload =
        serde_json::from_slice(bytes).map_err(|e| FileError::DecodingFailure(e.to_string()))?;
    Ok(payload.room)
}

/// 扫描项目
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub property_type: PropertyType,
    pub address: String,
    payload: Vec<u8>,
}

impl Project {
    /// 扫描完成时创建项目，编码失败则不产生记录
    pub fn create(
        property_type: PropertyType,
        address: impl Into<String>,
        room: &RoomScan,
    ) -> Result<Self, FileError> {
        let payload = encode_payload(room)?;
        Ok(Self::from_parts(
            Uuid::new_v4(),
            Utc::now(),
            property_type,
            address.into(),
            payload,
        ))
    }

    /// 从已存储的字段还原（用于文件加载）
    pub fn from_parts(
        id: Uuid,
        created_at: DateTime<Utc>,
        property_type: PropertyType,
        address: String,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            id,
            created_at,
            property_type,
            address,
            payload,
        }
    }

    /// 原始载荷
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// 解码房间
    pub fn decode(&self) -> Result<RoomScan, FileError> {
        decode_payload(&self.payload)
    }

    /// 解码房间，失败时记录日志并返回 `None`
    pub fn captured_room(&self) -> Option<RoomScan> {
        match self.decode() {
            Ok(room) => Some(room),
            Err(e) => {
                tracing::warn!(project = %self.id, "missing scan data: {}", e);
                None
            }
        }
    }

    /// 重新解码并投影
    pub fn projection(&self) -> Option<ProjectionResult> {
        self.captured_room().map(|room| project(&room))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::math::Point3;
    use floorplan_core::scan::Wall;

    fn sample_room() -> RoomScan {
        RoomScan::new(vec![
            Wall::from_pose(Point3::new(2.0, 1.2, 0.0), 0.0, 4.0, 2.4),
            Wall::from_pose(Point3::new(4.0, 1.2, -1.5), 1.2, 3.0, 2.4),
        ])
    }

    #[test]
    fn test_property_type_names() {
        assert_eq!(PropertyType::Townhouse.display_name(), "Townhouse");
        assert_eq!(PropertyType::Commercial.to_string(), "Commercial");
        for t in PropertyType::ALL {
            assert_eq!(t.as_str().parse::<PropertyType>().unwrap(), t);
        }
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_create_and_decode_roundtrip() {
        let room = sample_room();
        let project = Project::create(PropertyType::House, "1 Example St", &room).unwrap();
        let decoded = project.decode().unwrap();

        assert_eq!(decoded.wall_count(), room.wall_count());
        for (a, b) in decoded.walls.iter().zip(&room.walls) {
            assert_eq!(a.identifier, b.identifier);
            assert!((a.transform - b.transform).abs().max() < 1e-9);
            assert!((a.width() - b.width()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_non_finite_room_fails_to_encode() {
        let mut room = sample_room();
        room.walls[1].transform[(0, 3)] = f64::INFINITY;

        let err = Project::create(PropertyType::Other, "x", &room).unwrap_err();
        assert!(matches!(err, FileError::EncodingFailure(_)));
    }

    #[test]
    fn test_malformed_payload_decodes_softly() {
        let project = Project::from_parts(
            Uuid::new_v4(),
            Utc::now(),
            PropertyType::Apartment,
            "Unit 4".into(),
            b"{not json".to_vec(),
        );

        assert!(matches!(project.decode(), Err(FileError::DecodingFailure(_))));
        assert!(project.captured_room().is_none());
        assert!(project.projection().is_none());
    }

    #[test]
    fn test_newer_payload_version_is_rejected() {
        let bytes = br#"{"format_version": 99, "room": {"walls": []}}"#;
        assert!(matches!(decode_payload(bytes), Err(FileError::DecodingFailure(_))));
    }

    #[test]
    fn test_empty_room_is_not_a_failure() {
        let project = Project::create(PropertyType::House, "Vacant lot", &RoomScan::default()).unwrap();
        let projection = project.projection().unwrap();
        assert!(projection.is_empty());
    }
}
