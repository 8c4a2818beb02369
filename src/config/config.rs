/*! 配置文件解析 */

use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
    process::exit,
};

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::{Deserialize, Serialize};

static CONFIG: OnceCell<Config> = OnceCell::new();

/** `PWD_PATTERN` 从配置文件中生成的密码正则匹配式
 */
pub static PWD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&Config::get().user.password_check).unwrap());

/** `Config` 配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize)]
pub struct Config {
    pub server_worker_num: usize,
    pub http_worker_num: usize,
    pub tls: TlsConfig,
    pub safety: SafetyConfig,
    pub protocol: ProtocolConfig,
    pub user: UserConfig,
    pub database: DatabaseConfig,
    pub s3_oss: S3Config,
}

/** `TlsConfig` tls有关的配置信息的数据类型
 */
#[derive(Serialize, Debug, Deserialize)]
pub struct TlsConfig {
    pub enable: bool,
    pub private_key_file: String,
    pub cert_chain_file: String,
}

/** `ProtocolConfig` 服务端与轮询客户端之间协议的配置信息的数据类型
 */
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// 客户端的固定轮询间隔，秒
    pub poll_interval_sec: u64,
    /// 使用get_messages接口时单次能返回的最大消息数量
    pub max_messages_num_when_getting: u16,
}

/** `SafetyConfig` 安全性保证的配置信息的数据类型
 */
#[derive(Debug, Serialize, Deserialize)]
pub struct SafetyConfig {
    pub max_msg_length: u16,
    pub max_summary_length: u16,
    pub max_file_size: u64,
}

/** `UserConfig` 账号有关的配置信息的数据类型
 */
#[derive(Debug, Serialize, Deserialize)]
pub struct UserConfig {
    pub token_expire_time: u32,
    pub max_user_name_length: u32,
    pub password_check: String,
}

/** `DatabaseBackend` 数据库后端的选择
 */
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Memory,
    Redis,
}

/** `DatabaseConfig` 数据库的配置信息的数据类型
 */
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub address: String,
    pub pool_max_open: usize,
    pub pool_max_idle: usize,
    pub pool_timeout: usize,
    pub pool_expire: usize,
}

/** `S3Config` oss配置信息的数据类型
 */
#[derive(Debug, Serialize, Deserialize)]
pub struct S3Config {
    pub enable: bool,
    pub bucket_name: String,
    pub region: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,

    pub presign_put_file_expire: u32,
    pub presign_get_expire: u32,
}

impl Config {
    /** `init` 试图读取配置文件，生成Config
     */
    pub fn init() {
        match Self::try_read_from_file() {
            Ok(config) => {
                CONFIG.set(config).ok();
            }
            Err(_) => {
                println!("未找到配置文件，创建默认配置文件");

                let path = Config::get_config_path().expect("获得配置文件路径失败");

                let config = Config::default();
                let json = serde_json::to_string_pretty(&config).unwrap();

                let mut file = File::create(path).expect("创建配置文件失败");

                file.write_fmt(format_args!("{}", json))
                    .expect("写入配置文件失败");

                println!("默认配置文件写入到{}，请配置数据库与对象存储", json);
                exit(0);
            }
        }
    }

    /** `get` 调用CONFIG，未经init时使用默认配置
     */
    pub fn get() -> &'static Config {
        return CONFIG.get_or_init(Config::default);
    }

    fn default() -> Config {
        let core_num = num_cpus::get();
        Config {
            server_worker_num: core_num / 2,
            http_worker_num: core_num,
            tls: TlsConfig {
                enable: false,
                private_key_file: "private.pem".to_string(),
                cert_chain_file: "cert.pem".to_string(),
            },
            safety: SafetyConfig {
                max_msg_length: 2000,
                max_summary_length: 500,
                max_file_size: 10 * 1024 * 1024,
            },
            protocol: ProtocolConfig {
                poll_interval_sec: 5,
                max_messages_num_when_getting: 200,
            },
            user: UserConfig {
                max_user_name_length: 32,
                password_check: "^[a-fA-F0-9]{64}$".to_string(),
                token_expire_time: 604800,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Memory,
                address: "redis://127.0.0.1:6379/".to_string(),
                pool_max_open: 16,
                pool_max_idle: 8,
                pool_timeout: 1,
                pool_expire: 60,
            },
            s3_oss: S3Config {
                enable: false,
                region: "zh-east-1".to_string(),
                endpoint: "http://localhost:9000".to_owned(),
                bucket_name: "corncare".to_string(),
                access_key: "YOUR_ACCESS_KEY".to_string(),
                secret_key: "YOUR_SECRET_KEY".to_string(),
                presign_put_file_expire: 3600,
                presign_get_expire: 3600 * 24 * 7,
            },
        }
    }

    fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let mut path = std::env::current_dir()?;
        path.push("config/config.json");
        return Ok(path);
    }

    fn try_read_from_file() -> Result<Config, Box<dyn std::error::Error>> {
        let path = Self::get_config_path()?;

        let mut file = File::open(path)?;

        let mut json = String::new();
        file.read_to_string(&mut json).expect("配置文件读取失败");

        let obj = serde_json::from_str(&json).expect("配置文件序列化失败，请检查格式");

        return Ok(obj);
    }
}
