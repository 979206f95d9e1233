use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,   // 管理员
    Teacher, // 教师
    Student, // 学生
    Parent,  // 家长
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Teacher]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Teacher, &Self::Student, &Self::Parent]
    }

    /// 角色拥有的权限
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            UserRole::Admin => Permission::ALL,
            UserRole::Teacher => &[
                ViewTeachers,
                ViewStudents,
                ViewClasses,
                ViewSubjects,
                ManageExams,
                ViewExams,
                RecordResults,
                ViewResults,
                ViewReportCards,
                ViewDashboard,
                ExportData,
            ],
            UserRole::Student | UserRole::Parent => &[
                ViewClasses,
                ViewSubjects,
                ViewExams,
                ViewResults,
                ViewFees,
                ViewReportCards,
            ],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// 教职工可以查看全部学生数据，学生和家长只能查看自己（孩子）的数据
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Teacher)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, teacher, student, parent"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Parent => write!(f, "{}", UserRole::PARENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::PARENT => Ok(UserRole::Parent),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 权限
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum Permission {
    ManageUsers,
    ManageTeachers,
    ViewTeachers,
    ManageStudents,
    ViewStudents,
    ManageClasses,
    ViewClasses,
    ManageSubjects,
    ViewSubjects,
    ManageExams,
    ViewExams,
    RecordResults,
    ViewResults,
    ManageFees,
    ViewFees,
    ViewReportCards,
    ViewDashboard,
    ExportData,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::ManageUsers,
        Permission::ManageTeachers,
        Permission::ViewTeachers,
        Permission::ManageStudents,
        Permission::ViewStudents,
        Permission::ManageClasses,
        Permission::ViewClasses,
        Permission::ManageSubjects,
        Permission::ViewSubjects,
        Permission::ManageExams,
        Permission::ViewExams,
        Permission::RecordResults,
        Permission::ViewResults,
        Permission::ManageFees,
        Permission::ViewFees,
        Permission::ViewReportCards,
        Permission::ViewDashboard,
        Permission::ExportData,
    ];
}

// 用户状态
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_permission() {
        for permission in Permission::ALL {
            assert!(UserRole::Admin.has_permission(*permission));
        }
    }

    #[test]
    fn test_teacher_permissions() {
        let role = UserRole::Teacher;
        assert!(role.has_permission(Permission::RecordResults));
        assert!(role.has_permission(Permission::ViewDashboard));
        assert!(!role.has_permission(Permission::ManageFees));
        assert!(!role.has_permission(Permission::ManageUsers));
        assert!(!role.has_permission(Permission::ViewFees));
    }

    #[test]
    fn test_student_and_parent_are_read_only() {
        for role in [UserRole::Student, UserRole::Parent] {
            assert!(role.has_permission(Permission::ViewReportCards));
            assert!(role.has_permission(Permission::ViewFees));
            assert!(!role.has_permission(Permission::RecordResults));
            assert!(!role.has_permission(Permission::ViewStudents));
            assert!(!role.is_staff());
        }
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(&parsed, *role);
        }
        assert!("principal".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let err = serde_json::from_str::<UserRole>("\"janitor\"").unwrap_err();
        assert!(err.to_string().contains("janitor"));
        let role = serde_json::from_str::<UserRole>("\"parent\"").unwrap();
        assert_eq!(role, UserRole::Parent);
    }
}
