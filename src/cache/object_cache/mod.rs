pub mod moka;

/// 注册内置的缓存后端
pub fn register_builtin_plugins() {
    moka::register();
}
