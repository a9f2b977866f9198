//! 构建时根据 src/tests/endpoints.toml 生成测试用上传端点枚举与 env 变量名常量，供 tests 模块 include! 使用。

use std::env;
use std::fs;
use std::path::Path;

const ENDPOINTS_KEY: &str = "endpoints";

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR");
    let endpoints_path = Path::new(&manifest_dir).join("src/tests/endpoints.toml");
    println!("cargo:rerun-if-changed=src/tests/endpoints.toml");
    println!("cargo:rerun-if-changed=src/tests/env/.env.example");
    // env 目录变化（含删掉某个端点的 .env）时重新跑，从模板补回缺失的 {id}.env
    println!("cargo:rerun-if-changed=src/tests/env");

    let content = fs::read_to_string(&endpoints_path).unwrap_or_default();
    let endpoint_ids: Vec<String> = read_endpoint_ids(&content)
        .into_iter()
        .filter(|id| is_valid_id(id))
        .collect();

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR");
    let out_path = Path::new(&out_dir).join("test_endpoints.rs");
    fs::write(out_path, render_enum(&endpoint_ids)).expect("write test_endpoints.rs");

    // 给每个端点准备一份 env 文件（从 .env.example 复制），只需填写地址/账号/密码
    let env_dir = Path::new(&manifest_dir).join("src/tests/env");
    let Ok(template) = fs::read_to_string(env_dir.join(".env.example")) else {
        return;
    };
    for id in &endpoint_ids {
        let env_file = env_dir.join(format!("{id}.env"));
        if !env_file.exists() {
            fs::write(&env_file, &template).expect("write env file");
        }
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn to_pascal_case(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn render_enum(ids: &[String]) -> String {
    let mut variants = String::new();
    let mut as_str_arms = String::new();
    let mut all = String::new();

    for id in ids {
        let variant = to_pascal_case(id);
        if variant.is_empty() {
            continue;
        }
        variants.push_str(&format!("    {variant},\n"));
        as_str_arms.push_str(&format!("            TestEndpoint::{variant} => \"{id}\",\n"));
        all.push_str(&format!("            TestEndpoint::{variant},\n"));
    }

    // 没有端点时给一个占位变体，空枚举没法写 match
    if variants.is_empty() {
        variants.push_str("    #[allow(dead_code)]\n    __None,\n");
        as_str_arms.push_str("            TestEndpoint::__None => \"\",\n");
        all.push_str("            TestEndpoint::__None,\n");
    }

    format!(
        r#"// 自动生成，请勿手改。端点列表来自 src/tests/endpoints.toml

/// 测试可选的上传端点，用于在测试中选择用哪个 env 配置。
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestEndpoint {{
{variants}
}}

impl TestEndpoint {{
    /// 端点 id（与 env 文件名 {{id}}.env 对应）。
    pub fn as_str(&self) -> &'static str {{
        match self {{
{as_str_arms}
        }}
    }}

    /// 所有已配置的端点，便于逐个端点跑同一组测试。
    #[allow(dead_code)]
    pub fn all() -> &'static [TestEndpoint] {{
        static ALL: &[TestEndpoint] = &[
{all}
        ];
        ALL
    }}
}}

/// 测试 env 文件中使用的环境变量名。
#[allow(dead_code)]
pub mod env_var_names {{
    /// 接收 POST 的完整地址
    pub const UPLOAD_URL: &str = "UPLOAD_URL";
    /// 用户名（可选，填了才走 Basic 认证）
    pub const UPLOAD_USERNAME: &str = "UPLOAD_USERNAME";
    /// 密码（可选）
    pub const UPLOAD_PASSWORD: &str = "UPLOAD_PASSWORD";
}}
"#
    )
}

/// 读取端点 id：优先解析 `endpoints = ["a", "b"]`（可跨行），否则按一行一个处理，`#` 开头为注释。
fn read_endpoint_ids(content: &str) -> Vec<String> {
    if content.trim().is_empty() {
        return Vec::new();
    }
    parse_endpoints_array(content).unwrap_or_else(|| {
        content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    })
}

fn parse_endpoints_array(content: &str) -> Option<Vec<String>> {
    let after_key = &content[content.find(ENDPOINTS_KEY)? + ENDPOINTS_KEY.len()..];
    let open = after_key.find('[')?;
    let close = after_key[open..].find(']')? + open;
    let ids: Vec<String> = after_key[open + 1..close]
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() { None } else { Some(ids) }
}
