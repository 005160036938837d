//! 依赖覆盖的跨 crate 集成测试，测试代码位于 `tests/` 目录
