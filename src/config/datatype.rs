/*! 数据类型定义 */

// Consult
/** `RequestId` 咨询请求ID
*/
pub type RequestId = u64;

// User
/** `UserId` 账号ID，农户与专家共用一个ID空间
*/
pub type UserId = u32;

// Message
/** `MessageId` 消息在其会话内的序号，从1开始单调递增
*/
pub type MessageId = u64;

/** `Timestamp` 毫秒时间戳
*/
pub type Timestamp = u64;

/** `UploadId` 附件上传申请ID
*/
pub type UploadId = u64;

/** `SerializedChatMessage` 序列化的聊天消息
*/
pub type SerializedChatMessage = String;

/** `SerializedConsultRequest` 序列化的咨询请求
*/
pub type SerializedConsultRequest = String;
