/*!
 * 咨询请求的数据类型
*/

mod consult_request;

pub use consult_request::*;
