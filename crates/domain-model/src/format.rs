const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 人类可读的大小，1024 进制，两位小数，如 `1.50 KB`
pub fn format_file_size(bytes: u64) -> String {
    let mut len = bytes as f64;
    let mut order = 0;
    while len >= 1024.0 && order < SIZE_UNITS.len() - 1 {
        order += 1;
        len /= 1024.0;
    }
    format!("{:.2} {}", len, SIZE_UNITS[order])
}

/// 文件名最后一个点之后的部分，小写并带前导点；没有扩展名时返回空串
pub fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    }
}

/// 本地时间 `dd/mm/yyyy HH:MM:SS`，与远端 modified 字段格式一致
pub fn now_modified() -> String {
    chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}
