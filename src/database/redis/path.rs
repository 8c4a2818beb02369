// 维护全体账号邮箱到ID映射的哈希表
pub const USER_EMAIL_MAP: &str = "user:email_to_id";

// 维护最后一个账号ID，整数
pub const LAST_USER_ID: &str = "user:last_id";

// 维护最后一个咨询请求ID，整数
pub const LAST_REQ_ID: &str = "req:last_id";

// 维护等待受理的请求ID集合
pub const PENDING_REQS: &str = "req:pending";

// 维护令牌到序列化TokenRecord的哈希表
pub const TOKEN_MAP: &str = "user:token_to_id";

pub const LAST_UPLOAD_REQ_ID: &str = "file:lst_upd";

pub const FILE_UPLOAD_HASH: &str = "file:upload";

pub const FILE_URL: &str = "file:url";
