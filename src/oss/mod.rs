/*!
 * 对象存储，负责消息附件的上传与访问url
*/

mod s3;

pub use s3::*;
